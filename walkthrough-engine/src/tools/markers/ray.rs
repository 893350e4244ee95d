use bevy::prelude::*;

/// Distance along a normalised ray to the first hit on a sphere.
///
/// A ray starting inside the sphere reports the exit point.
pub fn ray_hits_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

// Nearest hit among `(key, center, radius)` spheres
pub fn pick_nearest<K>(
    ray_origin: Vec3,
    ray_dir: Vec3,
    spheres: impl IntoIterator<Item = (K, Vec3, f32)>,
) -> Option<K> {
    let mut best: Option<(K, f32)> = None;
    for (key, center, radius) in spheres {
        let Some(t) = ray_hits_sphere(ray_origin, ray_dir, center, radius) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, best_t)| t < *best_t) {
            best = Some((key, t));
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_in_front() {
        let t = ray_hits_sphere(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, Vec3::ZERO, 1.0);
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_miss_and_behind() {
        assert!(ray_hits_sphere(Vec3::new(0.0, 3.0, -5.0), Vec3::Z, Vec3::ZERO, 1.0).is_none());
        assert!(ray_hits_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_origin_inside_reports_exit() {
        let t = ray_hits_sphere(Vec3::ZERO, Vec3::X, Vec3::ZERO, 2.0);
        assert!((t.unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_pick_nearest_prefers_closest_hit() {
        let spheres = vec![
            ("far", Vec3::new(0.0, 0.0, 10.0), 1.0),
            ("near", Vec3::new(0.0, 0.0, 4.0), 1.0),
            ("off-axis", Vec3::new(5.0, 0.0, 2.0), 1.0),
        ];
        assert_eq!(pick_nearest(Vec3::ZERO, Vec3::Z, spheres), Some("near"));
    }

    #[test]
    fn test_pick_nearest_without_hits() {
        let spheres = vec![("a", Vec3::new(0.0, 10.0, 0.0), 1.0)];
        assert_eq!(pick_nearest(Vec3::ZERO, Vec3::Z, spheres), None);
    }
}
