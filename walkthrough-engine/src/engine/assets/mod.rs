//! Asset-side data for the walkthrough.
//!
//! Bounding volumes measured from scene geometry, and the JSON viewer
//! configuration loaded at startup.

/// World-space boxes and bounding spheres of scene subtrees.
pub mod bounds;

/// Viewer configuration asset with serde defaults.
pub mod viewer_config;
