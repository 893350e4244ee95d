//! Marker discovery over a grounded scene snapshot.
//!
//! Candidates come from the first [`CandidateStrategy`] that yields any,
//! then pass through geometry filtering, name deduplication and the count cap
//! before becoming [`Marker`]s. The named override is a separate pass
//! ([`super::override_rule`]).

use std::collections::HashSet;

use bevy::prelude::*;
use constants::markers::{MAX_MARKERS, MIN_MARKER_RADIUS, PLACEHOLDER_IMAGE, marker_description};

use crate::engine::assets::bounds::compute_sphere;
use crate::engine::scene::snapshot::{NodeId, SceneSnapshot};
use crate::tools::markers::marker::Marker;
use crate::tools::markers::override_rule::{MarkerOverride, apply_override};

/// One way of picking candidate nodes out of a scene.
pub trait CandidateStrategy {
    fn label(&self) -> &'static str;

    /// Candidate nodes in scene order.
    fn collect(&self, scene: &SceneSnapshot, root: NodeId) -> Vec<NodeId>;
}

/// Visible, named direct children of the root.
pub struct NamedChildren;

impl CandidateStrategy for NamedChildren {
    fn label(&self) -> &'static str {
        "named children"
    }

    fn collect(&self, scene: &SceneSnapshot, root: NodeId) -> Vec<NodeId> {
        scene
            .children(root)
            .iter()
            .copied()
            .filter(|&child| scene.name(child).is_some() && scene.is_visible(child))
            .collect()
    }
}

/// Every visible, named mesh anywhere under the root.
pub struct NamedLeafMeshes;

impl CandidateStrategy for NamedLeafMeshes {
    fn label(&self) -> &'static str {
        "named meshes"
    }

    fn collect(&self, scene: &SceneSnapshot, root: NodeId) -> Vec<NodeId> {
        scene
            .descendants(root)
            .into_iter()
            .filter(|&node| {
                scene.is_mesh(node) && scene.name(node).is_some() && scene.is_visible(node)
            })
            .collect()
    }
}

/// Tunables of the generic heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryLimits {
    pub max_markers: usize,
    /// Candidates at or below this radius are dropped.
    pub min_radius: f32,
    pub placeholder_image: String,
}

impl Default for DiscoveryLimits {
    fn default() -> Self {
        Self {
            max_markers: MAX_MARKERS,
            min_radius: MIN_MARKER_RADIUS,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Candidates from the first strategy that returns any.
pub fn gather_candidates(
    scene: &SceneSnapshot,
    root: NodeId,
    strategies: &[&dyn CandidateStrategy],
) -> Vec<NodeId> {
    for strategy in strategies {
        let candidates = strategy.collect(scene, root);
        if !candidates.is_empty() {
            debug!(
                "Marker candidates from {}: {}",
                strategy.label(),
                candidates.len()
            );
            return candidates;
        }
    }
    Vec::new()
}

/// Builds markers from `candidates`: skips nodes without usable geometry,
/// keeps the first node per name, stops at the cap.
pub fn build_markers(
    scene: &SceneSnapshot,
    candidates: &[NodeId],
    limits: &DiscoveryLimits,
) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut seen_names = HashSet::new();

    for &node in candidates {
        if markers.len() >= limits.max_markers {
            break;
        }
        let Some(name) = scene.name(node) else {
            continue;
        };

        let Some(sphere) = compute_sphere(scene, node) else {
            debug!("Skipping marker candidate '{name}': no finite geometry");
            continue;
        };
        if sphere.radius <= limits.min_radius {
            debug!(
                "Skipping marker candidate '{name}': radius {:.4} too small",
                sphere.radius
            );
            continue;
        }
        if !seen_names.insert(name.to_string()) {
            debug!("Skipping marker candidate '{name}': duplicate name");
            continue;
        }

        markers.push(Marker {
            id: scene.node_key(node),
            name: name.to_string(),
            center: sphere.center,
            radius: sphere.radius,
            description: Some(marker_description(name)),
            image: Some(limits.placeholder_image.clone()),
        });
    }

    markers
}

/// Generic discovery: named top-level nodes, falling back to named meshes.
pub fn discover(scene: &SceneSnapshot, root: NodeId, limits: &DiscoveryLimits) -> Vec<Marker> {
    let candidates = gather_candidates(scene, root, &[&NamedChildren, &NamedLeafMeshes]);
    build_markers(scene, &candidates, limits)
}

/// Full discovery pass for a grounded scene, named override included.
pub fn discover_markers(
    scene: &SceneSnapshot,
    limits: &DiscoveryLimits,
    rule: &MarkerOverride,
) -> Vec<Marker> {
    let mut markers = discover(scene, scene.content_root(), limits);
    apply_override(&mut markers, rule);
    markers
}
