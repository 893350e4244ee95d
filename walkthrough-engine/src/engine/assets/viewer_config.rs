use bevy::prelude::*;
use constants::flight::{FOCUS_DISTANCE_FACTOR, FOCUS_FLIGHT_SECONDS};
use constants::markers::PLACEHOLDER_IMAGE;
use constants::path::DEFAULT_SCENE_PATH;
use constants::render_settings::FALLBACK_SCENE_RADIUS;
use serde::{Deserialize, Serialize};

use crate::tools::markers::discovery::DiscoveryLimits;
use crate::tools::markers::override_rule::MarkerOverride;
use crate::tools::markers::selection::FocusSettings;

/// Viewer configuration as a Bevy asset. Every field may be omitted from the
/// JSON; missing fields take the built-in defaults.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath, Resource)]
#[serde(default)]
pub struct ViewerConfig {
    /// glTF scene to walk through, including the scene label.
    pub scene_path: String,
    /// Sphere radius used when the scene has no measurable geometry.
    pub fallback_radius: f32,
    pub placeholder_image: String,
    #[serde(rename = "override")]
    pub marker_override: MarkerOverride,
    pub flight_seconds: f32,
    /// Flight end distance as a multiple of the marker radius.
    pub focus_distance_factor: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene_path: DEFAULT_SCENE_PATH.to_string(),
            fallback_radius: FALLBACK_SCENE_RADIUS,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            marker_override: MarkerOverride::default(),
            flight_seconds: FOCUS_FLIGHT_SECONDS,
            focus_distance_factor: FOCUS_DISTANCE_FACTOR,
        }
    }
}

impl ViewerConfig {
    pub fn discovery_limits(&self) -> DiscoveryLimits {
        DiscoveryLimits {
            placeholder_image: self.placeholder_image.clone(),
            ..default()
        }
    }

    pub fn focus_settings(&self) -> FocusSettings {
        FocusSettings {
            flight_seconds: self.flight_seconds,
            distance_factor: self.focus_distance_factor,
        }
    }
}
