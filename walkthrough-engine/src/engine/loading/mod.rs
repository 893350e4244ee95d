//! Startup loading: viewer config, then the glTF scene.
//!
//! The config resolves first so the scene path and heuristics are known;
//! the scene's `SceneInstanceReady` observer then runs the session pipeline
//! (see `engine::core::session`) and marks the remaining progress flags.

/// Viewer config asset loading with fallback to defaults.
pub mod config_loader;

/// Loading progress flags gating the state transitions.
pub mod progress;

/// glTF scene spawning and load failure handling.
pub mod scene_loader;
