use bevy::prelude::*;

use crate::engine::scene::snapshot::{NodeId, SceneSnapshot};

/// Minimal sphere enclosing the world-space box of some geometry.
/// Derived data: recompute it whenever the source geometry moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Centre projected onto the ground plane (Y = 0).
    pub fn ground_center(&self) -> Vec3 {
        Vec3::new(self.center.x, 0.0, self.center.z)
    }
}

/// World-space axis-aligned box accumulated from finite vertex positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBox {
    /// Box around every finite point; `None` when no finite point exists.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<WorldBox>, p| match acc {
                Some(b) => Some(WorldBox {
                    min: b.min.min(p),
                    max: b.max.max(p),
                }),
                None => Some(WorldBox { min: p, max: p }),
            })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Sphere through the box corners, centred on the box.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.size().length() * 0.5)
    }
}

/// World-space box of all geometry under `node`, including the node's own mesh.
///
/// Reads the snapshot's resolved world transforms; callers that move nodes must
/// re-resolve them first (see [`SceneSnapshot::translate_root`]).
pub fn compute_box(scene: &SceneSnapshot, node: NodeId) -> Option<WorldBox> {
    WorldBox::from_points(scene.subtree_world_points(node))
}

/// Bounding sphere of all geometry under `node`.
///
/// `None` means the subtree has no finite geometry (empty group, NaN vertices);
/// callers skip such nodes rather than treating it as a failure.
pub fn compute_sphere(scene: &SceneSnapshot, node: NodeId) -> Option<BoundingSphere> {
    compute_box(scene, node).map(|b| b.bounding_sphere())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::snapshot::SceneNode;

    fn cube_points(half: f32) -> Vec<Vec3> {
        let mut points = Vec::new();
        for x in [-half, half] {
            for y in [-half, half] {
                for z in [-half, half] {
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn test_box_ignores_non_finite_points() {
        let b = WorldBox::from_points([
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-1.0, 0.0, f32::INFINITY),
            Vec3::new(-1.0, -2.0, -3.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_box_none_when_all_degenerate() {
        assert!(WorldBox::from_points([Vec3::NAN, Vec3::splat(f32::INFINITY)]).is_none());
        assert!(WorldBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_sphere_of_unit_cube() {
        let b = WorldBox::from_points(cube_points(1.0)).unwrap();
        let sphere = b.bounding_sphere();
        assert_eq!(sphere.center, Vec3::ZERO);
        assert!((sphere.radius - 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_compute_sphere_uses_world_transforms() {
        let mut scene = SceneSnapshot::new(SceneNode::group("root"));
        let root = scene.root();
        let group = scene.add_child(
            root,
            SceneNode::group("wing").with_transform(Transform::from_xyz(10.0, 0.0, 0.0)),
        );
        scene.add_child(
            group,
            SceneNode::mesh("room", cube_points(0.5))
                .with_transform(Transform::from_xyz(0.0, 5.0, 0.0)),
        );

        let sphere = compute_sphere(&scene, group).unwrap();
        assert!((sphere.center - Vec3::new(10.0, 5.0, 0.0)).length() < 1e-5);
        assert!((sphere.radius - 0.75_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_compute_sphere_none_for_empty_group() {
        let mut scene = SceneSnapshot::new(SceneNode::group("root"));
        let empty = scene.add_child(scene.root(), SceneNode::group("empty"));
        assert!(compute_sphere(&scene, empty).is_none());
    }

    #[test]
    fn test_ground_center_drops_height() {
        let sphere = BoundingSphere::new(Vec3::new(1.0, 7.0, -2.0), 3.0);
        assert_eq!(sphere.ground_center(), Vec3::new(1.0, 0.0, -2.0));
    }
}
