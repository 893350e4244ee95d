//! Loaded scene measurement and grounding.
//!
//! The live glTF hierarchy is copied into a [`snapshot::SceneSnapshot`] so
//! bounds can be measured without waiting for transform propagation.

/// Snapping the asset onto the ground plane.
pub mod normalizer;

/// Distance heuristics derived from the asset's bounding sphere.
pub mod scene_scale;

/// Owned copy of a scene subtree with resolved world transforms.
pub mod snapshot;
