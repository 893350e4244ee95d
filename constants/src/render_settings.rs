/// Asset radius used when the loaded scene has no finite geometry.
pub const FALLBACK_SCENE_RADIUS: f32 = 10.0;

/// Orbit limits as multiples of the asset radius.
pub const ORBIT_MIN_DISTANCE_FACTOR: f32 = 0.02;
pub const ORBIT_MIN_DISTANCE_FLOOR: f32 = 0.1;
pub const ORBIT_MAX_DISTANCE_FACTOR: f32 = 4.0;

/// Linear distance fog as multiples of the asset radius.
pub const FOG_START_FACTOR: f32 = 1.5;
pub const FOG_END_FACTOR: f32 = 6.0;
pub const FOG_COLOUR: [f32; 3] = [0.74, 0.78, 0.84];

/// Marker visual radius as a multiple of the asset radius.
pub const MARKER_SIZE_FACTOR: f32 = 0.015;
pub const MARKER_SIZE_FLOOR: f32 = 0.05;

/// Initial camera distance from the asset centre as a multiple of the asset radius.
pub const INITIAL_VIEW_DISTANCE_FACTOR: f32 = 1.6;

pub const MARKER_COLOUR: [f32; 3] = [0.95, 0.62, 0.12];
pub const MARKER_SELECTED_COLOUR: [f32; 3] = [0.2, 0.85, 1.0];
