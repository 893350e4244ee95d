use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    /// Scene grounded and markers discovered.
    SceneReady,
    Running,
}

// Transition to SceneReady once the load pipeline has run
pub fn transition_to_scene_ready(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.is_complete() {
        info!("→ Transitioning to SceneReady state");
        next_state.set(AppState::SceneReady);
    }
}

// Final transition to running state
pub fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("→ Scene ready, transitioning to Running state");
    next_state.set(AppState::Running);
}
