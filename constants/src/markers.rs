/// Hard cap on markers accepted in one discovery pass.
pub const MAX_MARKERS: usize = 20;

/// Candidates whose bounding sphere radius is at or below this are treated as noise.
pub const MIN_MARKER_RADIUS: f32 = 0.02;

/// Image shared by every generated marker.
pub const PLACEHOLDER_IMAGE: &str = "images/marker_placeholder.jpg";

/// Canonical name of the promoted marker.
pub const OVERRIDE_MARKER_NAME: &str = "Power Aisle";

/// Image assigned to the promoted marker.
pub const OVERRIDE_MARKER_IMAGE: &str = "images/power_aisle.jpg";

/// Description assigned to the promoted marker when it has none.
pub const OVERRIDE_MARKER_DESCRIPTION: &str =
    "The Power Aisle: the hotel's central corridor linking lobby, lifts and conference wing.";

/// Generated description for a discovered marker.
pub fn marker_description(name: &str) -> String {
    format!("Information about {name}.")
}
