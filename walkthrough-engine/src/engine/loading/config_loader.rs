use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::VIEWER_CONFIG_PATH;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
}

// Start the loading process
pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading viewer config from: {}", VIEWER_CONFIG_PATH);
    config_loader.handle = Some(asset_server.load(VIEWER_CONFIG_PATH));
}

/// Publishes the loaded config as a resource, or the defaults if the file
/// could not be loaded.
pub fn load_config_system(
    mut loading_progress: ResMut<LoadingProgress>,
    config_loader: Res<ConfigLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ViewerConfig>>,
) {
    if loading_progress.config_loaded {
        return;
    }
    let Some(handle) = config_loader.handle.as_ref() else {
        return;
    };

    let config = if let Some(config) = configs.get(handle) {
        info!("✓ Viewer config loaded, scene: {}", config.scene_path);
        config.clone()
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("Viewer config unavailable ({err}), using defaults");
        ViewerConfig::default()
    } else {
        return;
    };

    commands.insert_resource(config.focus_settings());
    commands.insert_resource(config);
    loading_progress.config_loaded = true;
}
