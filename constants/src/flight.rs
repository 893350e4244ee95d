use bevy::math::Vec3;

/// Flights shorter than this are stretched to it.
pub const MIN_FLIGHT_DURATION: f32 = 0.2;

/// Added to the orbit minimum distance when clamping a flight's end distance.
pub const MIN_DISTANCE_EPSILON: f32 = 0.01;

/// Viewing direction used when the camera coincides with its target (not normalised).
pub const DEFAULT_VIEW_DIRECTION: Vec3 = Vec3::new(1.0, 0.5, 1.0);

/// Default duration of a marker focus flight, in seconds.
pub const FOCUS_FLIGHT_SECONDS: f32 = 1.2;

/// Marker focus distance as a multiple of the marker radius.
pub const FOCUS_DISTANCE_FACTOR: f32 = 2.5;
