//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and the per-load session that wires scene, markers and camera together.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading, marker and RPC plugins, and
/// state-gated runtime systems.
pub mod app_setup;

/// Application state machine: Loading → SceneReady → Running.
pub mod app_state;

/// Scene load pipeline run when the glTF scene is instantiated.
pub mod session;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
