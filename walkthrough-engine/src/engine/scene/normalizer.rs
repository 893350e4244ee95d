use bevy::prelude::*;

use crate::engine::assets::bounds::{BoundingSphere, compute_box};
use crate::engine::scene::snapshot::SceneSnapshot;

/// Marks a scene root whose ground offset has already been applied.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundSnapped {
    pub offset: f32,
}

/// Outcome of snapping one loaded asset onto the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedScene {
    /// Asset sphere measured before the ground offset was applied. Its centre
    /// keeps the authored height; use [`BoundingSphere::ground_center`] for a
    /// ground-relative point.
    pub sphere: BoundingSphere,
    /// Vertical translation added to the root.
    pub ground_offset: f32,
    /// False when the asset had no finite geometry and `sphere` is the fallback.
    pub has_geometry: bool,
}

/// Lifts or lowers the snapshot root so its lowest vertex lands on Y = 0.
///
/// The sphere is measured first, on the untouched snapshot; the root is then
/// translated and the snapshot's world transforms re-resolved, so later
/// bounds queries see the grounded positions. The caller mirrors
/// `ground_offset` onto the live root entity.
///
/// With no finite geometry nothing moves and a sphere of `fallback_radius`
/// at the origin is reported.
pub fn normalize(scene: &mut SceneSnapshot, fallback_radius: f32) -> NormalizedScene {
    let Some(world_box) = compute_box(scene, scene.root()) else {
        return NormalizedScene {
            sphere: BoundingSphere::new(Vec3::ZERO, fallback_radius),
            ground_offset: 0.0,
            has_geometry: false,
        };
    };

    let sphere = world_box.bounding_sphere();
    let ground_offset = -world_box.min.y;
    scene.translate_root(Vec3::Y * ground_offset);

    NormalizedScene {
        sphere,
        ground_offset,
        has_geometry: true,
    }
}
