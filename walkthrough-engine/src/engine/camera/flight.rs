use bevy::prelude::*;
use constants::flight::{DEFAULT_VIEW_DIRECTION, MIN_DISTANCE_EPSILON, MIN_FLIGHT_DURATION};

use crate::engine::camera::viewport_camera::ViewportCamera;

/// Work to run once a flight has applied its final pose.
pub type FlightContinuation = Box<dyn FnOnce(&mut World) + Send + Sync + 'static>;

/// The camera pose a flight reads and writes: the camera transform plus the
/// orbit anchor, when orbit controls exist.
pub struct CameraRig<'a> {
    pub transform: &'a mut Transform,
    pub orbit: Option<&'a mut ViewportCamera>,
}

impl<'a> CameraRig<'a> {
    pub fn new(transform: &'a mut Transform, orbit: Option<&'a mut ViewportCamera>) -> Self {
        Self { transform, orbit }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// Orbit anchor, or one unit along the view direction without orbit controls.
    pub fn target(&self) -> Vec3 {
        match &self.orbit {
            Some(orbit) => orbit.target,
            None => self.transform.translation + *self.transform.forward(),
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.orbit.as_ref().map_or(0.0, |orbit| orbit.min_distance)
    }

    /// Writes the position, then aims via the orbit anchor or a direct look-at.
    pub fn apply(&mut self, position: Vec3, target: Vec3) {
        self.transform.translation = position;
        if let Some(orbit) = self.orbit.as_deref_mut() {
            orbit.target = target;
        }
        if (target - position).length_squared() > f32::EPSILON {
            self.transform.look_at(target, Vec3::Y);
        }
    }
}

/// One in-progress transition.
pub struct FlightState {
    pub start_position: Vec3,
    pub start_target: Vec3,
    pub end_position: Vec3,
    pub end_target: Vec3,
    pub elapsed: f32,
    pub duration: f32,
    on_complete: Option<FlightContinuation>,
}

impl FlightState {
    /// Normalised progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Interpolated `(position, target)` at the current progress.
    pub fn pose(&self) -> (Vec3, Vec3) {
        let eased = smoothstep(self.progress());
        (
            self.start_position.lerp(self.end_position, eased),
            self.start_target.lerp(self.end_target, eased),
        )
    }
}

/// Smoothstep ease, `k²(3 − 2k)`: zero velocity at both ends.
pub fn smoothstep(k: f32) -> f32 {
    k * k * (3.0 - 2.0 * k)
}

/// Owns at most one camera flight. A new request replaces the current one
/// immediately; the replaced flight's continuation is dropped, never run.
#[derive(Resource, Default)]
pub struct FlightController {
    active: Option<FlightState>,
}

impl FlightController {
    pub fn is_flying(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&FlightState> {
        self.active.as_ref()
    }

    /// Starts a flight that ends looking at `target_point` from `desired_distance`
    /// away, along the camera's current viewing direction.
    ///
    /// The distance is raised to just beyond the orbit minimum and the duration
    /// to [`MIN_FLIGHT_DURATION`]; neither request is ever rejected.
    pub fn fly_to(
        &mut self,
        rig: &CameraRig,
        target_point: Vec3,
        desired_distance: f32,
        duration: f32,
        on_complete: Option<FlightContinuation>,
    ) {
        let start_position = rig.position();
        let start_target = rig.target();

        let direction = (start_position - start_target)
            .try_normalize()
            .unwrap_or_else(|| DEFAULT_VIEW_DIRECTION.normalize());
        let distance = desired_distance.max(rig.min_distance() + MIN_DISTANCE_EPSILON);

        self.active = Some(FlightState {
            start_position,
            start_target,
            end_position: target_point + direction * distance,
            end_target: target_point,
            elapsed: 0.0,
            duration: duration.max(MIN_FLIGHT_DURATION),
            on_complete,
        });
    }

    /// Advances the active flight by `delta` seconds and applies the eased pose.
    ///
    /// When the flight reaches its duration the final pose is applied, the
    /// flight is cleared and its continuation queued on `commands`. Without an
    /// active flight this does nothing.
    pub fn advance(&mut self, delta: f32, rig: &mut CameraRig, commands: &mut Commands) {
        let Some(flight) = self.active.as_mut() else {
            return;
        };

        flight.elapsed = (flight.elapsed + delta.max(0.0)).min(flight.duration);
        let (position, target) = flight.pose();
        rig.apply(position, target);

        if flight.elapsed >= flight.duration {
            if let Some(on_complete) = self.active.take().and_then(|f| f.on_complete) {
                commands.queue(move |world: &mut World| on_complete(world));
            }
        }
    }
}

/// Per-frame tick: advances the flight with the frame's elapsed time.
pub fn advance_camera_flight(
    time: Res<Time>,
    mut flight: ResMut<FlightController>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mut viewport: Option<ResMut<ViewportCamera>>,
    mut commands: Commands,
) {
    if !flight.is_flying() {
        return;
    }
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    let mut rig = CameraRig::new(&mut transform, viewport.as_deref_mut());
    flight.advance(time.delta_secs(), &mut rig, &mut commands);
}
