use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::core::session::{SceneLoadContext, on_scene_ready};
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct SceneLoader {
    handle: Option<Handle<Scene>>,
    root: Option<Entity>,
}

/// Spawns the configured glTF scene once the config is known. The session
/// observer on the root runs when the scene has been instantiated.
pub fn request_scene(
    mut loading_progress: ResMut<LoadingProgress>,
    mut scene_loader: ResMut<SceneLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Option<Res<ViewerConfig>>,
) {
    if loading_progress.scene_requested || !loading_progress.config_loaded {
        return;
    }
    let Some(config) = config else {
        return;
    };

    info!("Loading scene from: {}", config.scene_path);
    let handle: Handle<Scene> = asset_server.load(config.scene_path.clone());
    let root = commands
        .spawn((Name::new("Walkthrough Scene"), SceneRoot(handle.clone())))
        .observe(on_scene_ready)
        .id();

    scene_loader.handle = Some(handle);
    scene_loader.root = Some(root);
    loading_progress.scene_requested = true;
}

/// A scene that fails to load still completes the pipeline: no geometry,
/// fallback scale, no markers.
pub fn watch_scene_failure(
    mut scene_loader: ResMut<SceneLoader>,
    asset_server: Res<AssetServer>,
    mut context: SceneLoadContext,
) {
    let Some(handle) = scene_loader.handle.as_ref() else {
        return;
    };
    let LoadState::Failed(err) = asset_server.load_state(handle.id()) else {
        return;
    };

    warn!("Scene failed to load ({err}), continuing without geometry");
    scene_loader.handle = None;
    let root = scene_loader.root.take();
    context.load_empty(root);
}
