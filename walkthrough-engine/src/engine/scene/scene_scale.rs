//! Distance heuristics scaled by the loaded asset's bounding sphere.
//!
//! Fog, orbit limits and marker size all derive from one radius so that a
//! model authored in centimetres navigates like one authored in metres.

use bevy::prelude::*;
use constants::flight::DEFAULT_VIEW_DIRECTION;
use constants::render_settings::{
    FALLBACK_SCENE_RADIUS, FOG_END_FACTOR, FOG_START_FACTOR, INITIAL_VIEW_DISTANCE_FACTOR,
    MARKER_SIZE_FACTOR, MARKER_SIZE_FLOOR, ORBIT_MAX_DISTANCE_FACTOR, ORBIT_MIN_DISTANCE_FACTOR,
    ORBIT_MIN_DISTANCE_FLOOR,
};

use crate::engine::assets::bounds::BoundingSphere;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SceneScale {
    pub sphere: BoundingSphere,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
    pub fog_start: f32,
    pub fog_end: f32,
    /// Drawn radius of marker spheres.
    pub marker_size: f32,
}

impl SceneScale {
    pub fn from_sphere(sphere: BoundingSphere) -> Self {
        let radius = if sphere.radius.is_finite() && sphere.radius > 0.0 {
            sphere.radius
        } else {
            FALLBACK_SCENE_RADIUS
        };

        let orbit_min_distance = (radius * ORBIT_MIN_DISTANCE_FACTOR).max(ORBIT_MIN_DISTANCE_FLOOR);
        Self {
            sphere,
            orbit_min_distance,
            orbit_max_distance: (radius * ORBIT_MAX_DISTANCE_FACTOR).max(orbit_min_distance),
            fog_start: radius * FOG_START_FACTOR,
            fog_end: radius * FOG_END_FACTOR,
            marker_size: (radius * MARKER_SIZE_FACTOR).max(MARKER_SIZE_FLOOR),
        }
    }

    /// Orbit anchor for the whole asset: sphere centre on the ground plane.
    pub fn orbit_target(&self) -> Vec3 {
        self.sphere.ground_center()
    }

    pub fn initial_camera_position(&self) -> Vec3 {
        let distance = (self.sphere.radius.max(0.0) * INITIAL_VIEW_DISTANCE_FACTOR)
            .clamp(self.orbit_min_distance, self.orbit_max_distance);
        self.orbit_target() + DEFAULT_VIEW_DIRECTION.normalize() * distance
    }
}

impl Default for SceneScale {
    fn default() -> Self {
        Self::from_sphere(BoundingSphere::new(Vec3::ZERO, FALLBACK_SCENE_RADIUS))
    }
}
