//! JSON-RPC 2.0 communication layer for the frontend.
//!
//! Implements bidirectional messaging between the Bevy engine and the page
//! hosting it via iframe postMessage, supporting both request-response and
//! notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Page (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (missing `id`, unknown marker)
//! - `-32002`: Marker command sent before the scene is running
//!
//! ## Methods
//!
//! - `get_markers`: Discovered markers in discovery order
//! - `get_selection`: `{ "id": <marker id> | null }`
//! - `get_scene`: grounded asset sphere, `{ "loaded": false }` until a load completes
//! - `focus_marker`: `{ "id" }`, selects the marker and flies the camera to it
//! - `clear_selection`: Dismisses the current selection
//!
//! ## Notifications
//!
//! - `markers_discovered`: `{ "markers": [...] }` after every scene load; an
//!   empty list means nothing was found
//! - `marker_selected`: `{ "id" }`
//! - `selection_cleared`
//! - `flight_complete`: `{ "id" }` when a focus flight lands

/// JSON-RPC 2.0 bidirectional communication system.
///
/// Handles marker requests, lifecycle notifications, and WASM message listeners.
pub mod web_rpc;
