//! Interactive tools layered over the loaded scene.
//!
//! Markers are the only tool: discovery turns the grounded scene graph into
//! a short list of points of interest, and selection flies the camera to
//! them on click, number key or RPC request.

/// Marker discovery, override, visuals and selection.
pub mod markers;
