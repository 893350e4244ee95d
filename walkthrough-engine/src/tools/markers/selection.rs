use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::flight::{FOCUS_DISTANCE_FACTOR, FOCUS_FLIGHT_SECONDS};
use thiserror::Error;

use super::marker::{DiscoveredMarkers, Marker};
use super::ray::pick_nearest;
use super::render::MarkerVisual;
use crate::engine::camera::flight::{CameraRig, FlightController};
use crate::engine::camera::viewport_camera::ViewportCamera;

/// The highlighted marker, if any.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Clears the selection, returning whether anything was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }
}

/// How far and how long a focus flight goes.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FocusSettings {
    pub flight_seconds: f32,
    pub distance_factor: f32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            flight_seconds: FOCUS_FLIGHT_SECONDS,
            distance_factor: FOCUS_DISTANCE_FACTOR,
        }
    }
}

/// Request to select a marker and fly to it.
#[derive(Event, Debug, Clone)]
pub struct FocusMarkerEvent {
    pub id: String,
}

#[derive(Event, Debug, Clone, Default)]
pub struct DismissSelectionEvent;

/// Sent once a focus flight has landed on its marker.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MarkerArrived {
    pub id: String,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum SelectionChanged {
    Selected(String),
    Cleared,
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("no marker with id '{0}'")]
    UnknownMarker(String),
}

pub fn resolve_marker<'a>(
    markers: &'a DiscoveredMarkers,
    id: &str,
) -> Result<&'a Marker, SelectionError> {
    markers
        .get(id)
        .ok_or_else(|| SelectionError::UnknownMarker(id.to_string()))
}

/// Selects `marker` and starts a flight that frames it. Landing sends
/// [`MarkerArrived`]; a flight replaced before landing sends nothing.
pub fn focus_marker(
    marker: &Marker,
    selection: &mut SelectionState,
    flight: &mut FlightController,
    rig: &CameraRig,
    settings: &FocusSettings,
) {
    selection.select(marker.id.clone());

    let id = marker.id.clone();
    flight.fly_to(
        rig,
        marker.center,
        marker.radius * settings.distance_factor,
        settings.flight_seconds,
        Some(Box::new(move |world: &mut World| {
            world.send_event(MarkerArrived { id });
        })),
    );
}

pub fn handle_focus_requests(
    mut requests: EventReader<FocusMarkerEvent>,
    markers: Res<DiscoveredMarkers>,
    settings: Res<FocusSettings>,
    mut selection: ResMut<SelectionState>,
    mut flight: ResMut<FlightController>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mut viewport: Option<ResMut<ViewportCamera>>,
    mut changes: EventWriter<SelectionChanged>,
) {
    for request in requests.read() {
        let marker = match resolve_marker(&markers, &request.id) {
            Ok(marker) => marker,
            Err(err) => {
                warn!("Ignoring focus request: {err}");
                continue;
            }
        };
        let Ok(mut transform) = cameras.single_mut() else {
            warn!("Ignoring focus request for '{}': no camera", marker.name);
            continue;
        };

        let rig = CameraRig::new(&mut transform, viewport.as_deref_mut());
        focus_marker(marker, &mut selection, &mut flight, &rig, &settings);
        info!("Focusing marker '{}' ({})", marker.name, marker.id);
        changes.write(SelectionChanged::Selected(marker.id.clone()));
    }
}

pub fn handle_dismiss_requests(
    mut requests: EventReader<DismissSelectionEvent>,
    mut selection: ResMut<SelectionState>,
    mut changes: EventWriter<SelectionChanged>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if selection.clear() {
        changes.write(SelectionChanged::Cleared);
    }
}

// Left click picks the nearest marker under the cursor
pub fn select_marker_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    visuals: Query<(&MarkerVisual, &GlobalTransform)>,
    mut focus: EventWriter<FocusMarkerEvent>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((cam_xf, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_xf, cursor_pos) else {
        return;
    };

    let hit = pick_nearest(
        ray.origin,
        ray.direction.as_vec3(),
        visuals
            .iter()
            .map(|(visual, xf)| (visual.id.as_str(), xf.translation(), visual.hit_radius)),
    );
    if let Some(id) = hit {
        focus.write(FocusMarkerEvent { id: id.to_string() });
    }
}

const SHORTCUT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

// Number keys 1-9 focus markers in discovery order
pub fn focus_marker_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    markers: Res<DiscoveredMarkers>,
    mut focus: EventWriter<FocusMarkerEvent>,
) {
    for (index, key) in SHORTCUT_KEYS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        if let Some(marker) = markers.nth(index) {
            focus.write(FocusMarkerEvent {
                id: marker.id.clone(),
            });
        }
    }
}

pub fn dismiss_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut dismiss: EventWriter<DismissSelectionEvent>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        dismiss.write(DismissSelectionEvent);
    }
}
