use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub scene_requested: bool,
    pub scene_normalized: bool,
    pub markers_discovered: bool,
}

impl LoadingProgress {
    pub fn is_complete(&self) -> bool {
        self.config_loaded && self.scene_requested && self.scene_normalized && self.markers_discovered
    }
}
