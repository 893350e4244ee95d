use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::engine::camera::flight::FlightController;
use crate::engine::scene::scene_scale::SceneScale;

/// Orbit controls: the look-at anchor and the distance limits around it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_sensitivity: f32,
    pub zoom_step: f32,
}

const MIN_PITCH: f32 = -0.2;
const MAX_PITCH: f32 = 1.5;

impl ViewportCamera {
    pub fn with_scale(scale: &SceneScale) -> Self {
        Self {
            target: scale.orbit_target(),
            min_distance: scale.orbit_min_distance,
            max_distance: scale.orbit_max_distance,
            ..default()
        }
    }

    /// Camera position after orbiting `position` about the target and zooming.
    ///
    /// `zoom_steps > 0` moves closer. The resulting distance is clamped to the
    /// orbit limits and the pitch kept between just below the horizon and
    /// almost straight down.
    pub fn orbit(&self, position: Vec3, yaw_delta: f32, pitch_delta: f32, zoom_steps: f32) -> Vec3 {
        let offset = position - self.target;
        let distance = offset.length();
        let (yaw, pitch) = if distance > f32::EPSILON {
            (offset.x.atan2(offset.z), (offset.y / distance).clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.5)
        };

        let yaw = yaw + yaw_delta;
        let pitch = (pitch + pitch_delta).clamp(MIN_PITCH, MAX_PITCH);
        let distance = (distance * (1.0 - self.zoom_step).powf(zoom_steps))
            .clamp(self.min_distance, self.max_distance);

        let direction = Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            pitch.cos() * yaw.cos(),
        );
        self.target + direction * distance
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        let scale = SceneScale::default();
        Self {
            target: Vec3::ZERO,
            min_distance: scale.orbit_min_distance,
            max_distance: scale.orbit_max_distance,
            rotate_sensitivity: 0.005,
            zoom_step: 0.1,
        }
    }
}

/// Right-drag orbits, the wheel zooms. Input is ignored while a flight owns the camera.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    viewport: Res<ViewportCamera>,
    flight: Res<FlightController>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    let total_motion: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    let zoom_steps: f32 = scroll_events
        .read()
        .map(|scroll| match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / 40.0,
        })
        .sum();

    if flight.is_flying() {
        return;
    }

    let rotating = mouse_button.pressed(MouseButton::Right) && total_motion != Vec2::ZERO;
    if !rotating && zoom_steps == 0.0 {
        return;
    }

    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let (yaw_delta, pitch_delta) = if rotating {
        (
            -total_motion.x * viewport.rotate_sensitivity,
            total_motion.y * viewport.rotate_sensitivity,
        )
    } else {
        (0.0, 0.0)
    };

    let position = viewport.orbit(camera_transform.translation, yaw_delta, pitch_delta, zoom_steps);
    *camera_transform = Transform::from_translation(position).looking_at(viewport.target, Vec3::Y);
}
