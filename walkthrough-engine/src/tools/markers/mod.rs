//! Points of interest discovered in the loaded scene.
//!
//! ## Pipeline
//!
//! ```text
//! SceneSnapshot (grounded)
//!   └─> discovery::discover()          generic heuristic
//!       ├─> NamedChildren              visible named children of the content root
//!       └─> NamedLeafMeshes            fallback: every visible named mesh
//!       └─> filter / dedup / cap / synthesise
//!   └─> override_rule::apply_override() promote exactly one marker
//!   └─> render::spawn_marker_visuals()  clickable spheres
//! ```
//!
//! ## Selection
//!
//! Clicks, number keys and RPC requests all funnel into `FocusMarkerEvent`.
//! `handle_focus_requests()` selects the marker and starts a camera flight;
//! landing sends `MarkerArrived`. Escape or `clear_selection` sends
//! `DismissSelectionEvent`, which clears the selection and leaves the camera
//! where it is.

/// Candidate strategies and the generic discovery heuristic.
pub mod discovery;

/// Marker value type and the per-load marker list resource.
pub mod marker;

/// Single named-marker promotion applied after discovery.
pub mod override_rule;

/// Ray/sphere intersection for marker picking.
pub mod ray;

/// Marker spheres and selection highlighting.
pub mod render;

/// Selection state, focus flights and input handling.
pub mod selection;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;

pub use marker::{DiscoveredMarkers, Marker, MarkersDiscovered};
pub use selection::{
    DismissSelectionEvent, FocusMarkerEvent, FocusSettings, MarkerArrived, SelectionChanged,
    SelectionState,
};

use render::highlight_selected_marker;
use selection::{
    dismiss_on_escape, focus_marker_shortcuts, handle_dismiss_requests, handle_focus_requests,
    select_marker_on_click,
};

// Registers marker resources, events, and interaction systems.
pub struct MarkerPlugin;

impl Plugin for MarkerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DiscoveredMarkers>()
            .init_resource::<SelectionState>()
            .init_resource::<FocusSettings>()
            .add_event::<MarkersDiscovered>()
            .add_event::<FocusMarkerEvent>()
            .add_event::<DismissSelectionEvent>()
            .add_event::<MarkerArrived>()
            .add_event::<SelectionChanged>()
            .add_systems(
                Update,
                (
                    // Input
                    select_marker_on_click,
                    focus_marker_shortcuts,
                    dismiss_on_escape,
                    // Requests
                    handle_focus_requests,
                    handle_dismiss_requests,
                    highlight_selected_marker,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
