/// Viewer configuration, relative to the asset root.
pub const VIEWER_CONFIG_PATH: &str = "config/viewer.json";

/// Hotel model used when the configuration does not name one.
pub const DEFAULT_SCENE_PATH: &str = "models/hotel.glb#Scene0";
