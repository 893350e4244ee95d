//! Camera navigation for the walkthrough.
//!
//! Orbit controls scaled to the loaded asset, plus timed fly-to transitions
//! that take over the camera while they run.

/// Viewport camera resource and orbit/zoom controller system.
pub mod viewport_camera;

/// Interruptible eased camera flights with completion continuations.
pub mod flight;
