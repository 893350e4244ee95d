use constants::markers::{OVERRIDE_MARKER_DESCRIPTION, OVERRIDE_MARKER_IMAGE, OVERRIDE_MARKER_NAME};
use serde::{Deserialize, Serialize};

use crate::tools::markers::marker::Marker;

/// Hand-authored identity promoted onto exactly one discovered marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerOverride {
    pub name: String,
    pub image: String,
    pub description: String,
}

impl Default for MarkerOverride {
    fn default() -> Self {
        Self {
            name: OVERRIDE_MARKER_NAME.to_string(),
            image: OVERRIDE_MARKER_IMAGE.to_string(),
            description: OVERRIDE_MARKER_DESCRIPTION.to_string(),
        }
    }
}

/// Promotes one marker to the override identity, in place.
///
/// The target is the first marker whose name matches `rule.name` ignoring
/// case, else the first marker. Its name becomes exactly `rule.name`, its
/// image `rule.image`; the description is only filled when missing. Returns
/// the index of the promoted marker, `None` for an empty list.
pub fn apply_override(markers: &mut [Marker], rule: &MarkerOverride) -> Option<usize> {
    let wanted = rule.name.to_lowercase();
    let index = markers
        .iter()
        .position(|m| m.name.to_lowercase() == wanted)
        .or(if markers.is_empty() { None } else { Some(0) })?;

    let marker = &mut markers[index];
    marker.name = rule.name.clone();
    marker.image = Some(rule.image.clone());
    if marker.description.as_deref().is_none_or(str::is_empty) {
        marker.description = Some(rule.description.clone());
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;

    fn marker(id: &str, name: &str) -> Marker {
        Marker {
            id: id.to_string(),
            name: name.to_string(),
            center: Vec3::ZERO,
            radius: 1.0,
            description: Some(format!("Information about {name}.")),
            image: Some("placeholder.jpg".to_string()),
        }
    }

    #[test]
    fn test_case_insensitive_match_is_promoted_in_place() {
        let mut markers = vec![marker("a", "Lobby"), marker("b", "POWER aisle"), marker("c", "Bar")];
        let rule = MarkerOverride::default();

        assert_eq!(apply_override(&mut markers, &rule), Some(1));

        assert_eq!(markers[1].name, OVERRIDE_MARKER_NAME);
        assert_eq!(markers[1].image.as_deref(), Some(OVERRIDE_MARKER_IMAGE));
        assert_eq!(markers[1].id, "b");
        assert_eq!(markers[0].name, "Lobby");
        assert_eq!(markers[0].image.as_deref(), Some("placeholder.jpg"));
    }

    #[test]
    fn test_first_marker_promoted_without_match() {
        let mut markers = vec![marker("a", "Lobby"), marker("b", "Bar")];

        assert_eq!(apply_override(&mut markers, &MarkerOverride::default()), Some(0));

        assert_eq!(markers[0].name, "Power Aisle");
        assert_eq!(markers[0].image.as_deref(), Some(OVERRIDE_MARKER_IMAGE));
        assert_eq!(markers[1].name, "Bar");
    }

    #[test]
    fn test_existing_description_is_kept() {
        let mut markers = vec![marker("a", "Lobby")];
        apply_override(&mut markers, &MarkerOverride::default());
        assert_eq!(markers[0].description.as_deref(), Some("Information about Lobby."));
    }

    #[test]
    fn test_missing_description_is_filled() {
        let mut markers = vec![marker("a", "Lobby")];
        markers[0].description = None;
        apply_override(&mut markers, &MarkerOverride::default());
        assert_eq!(markers[0].description.as_deref(), Some(OVERRIDE_MARKER_DESCRIPTION));
    }

    #[test]
    fn test_empty_list_is_untouched() {
        let mut markers: Vec<Marker> = Vec::new();
        assert_eq!(apply_override(&mut markers, &MarkerOverride::default()), None);
    }

    #[test]
    fn test_only_one_marker_is_promoted() {
        let mut markers = vec![marker("a", "power aisle"), marker("b", "Power Aisle")];
        apply_override(&mut markers, &MarkerOverride::default());
        assert_eq!(markers[0].image.as_deref(), Some(OVERRIDE_MARKER_IMAGE));
        assert_eq!(markers[1].image.as_deref(), Some("placeholder.jpg"));
    }
}
