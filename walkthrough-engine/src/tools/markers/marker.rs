use bevy::prelude::*;
use serde::Serialize;

/// A discovered point of interest.
///
/// `id` comes from the scene node the marker was built from, so it is stable
/// while that load lives and changes on reload.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub center: Vec3,
    pub radius: f32,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Markers from the latest discovery pass, in discovery order.
#[derive(Resource, Debug, Clone, Default)]
pub struct DiscoveredMarkers {
    pub markers: Vec<Marker>,
}

impl DiscoveredMarkers {
    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn nth(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Sent after each discovery pass, including passes that found nothing.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MarkersDiscovered {
    pub count: usize,
}

/// Wire form of a marker for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerPayload<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub center: [f32; 3],
    pub radius: f32,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a Marker> for MarkerPayload<'a> {
    fn from(marker: &'a Marker) -> Self {
        Self {
            id: &marker.id,
            name: &marker.name,
            center: marker.center.to_array(),
            radius: marker.radius,
            description: marker.description.as_deref(),
            image: marker.image.as_deref(),
        }
    }
}
