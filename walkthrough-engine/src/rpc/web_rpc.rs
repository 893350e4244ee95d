use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::app_state::AppState;
use crate::engine::core::session::ViewerSession;
use crate::tools::markers::marker::{DiscoveredMarkers, MarkerPayload, MarkersDiscovered};
use crate::tools::markers::selection::{
    DismissSelectionEvent, FocusMarkerEvent, MarkerArrived, SelectionChanged, SelectionState,
    resolve_marker,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Marker action requested over RPC, applied as an engine event.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerCommand {
    Focus(String),
    Dismiss,
}

/// Engine state a request is answered from.
pub struct RpcContext<'a> {
    pub markers: &'a DiscoveredMarkers,
    pub selection: &'a SelectionState,
    pub session: &'a ViewerSession,
    /// Marker commands are only applied once the viewer is running.
    pub accepts_commands: bool,
}

/// Resource managing bidirectional RPC communication between the frontend and Bevy.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the WebRPC layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_marker_notifications,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    markers: Res<DiscoveredMarkers>,
    selection: Res<SelectionState>,
    session: Res<ViewerSession>,
    app_state: Res<State<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut focus_events: EventWriter<FocusMarkerEvent>,
    mut dismiss_events: EventWriter<DismissSelectionEvent>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let context = RpcContext {
            markers: &markers,
            selection: &selection,
            session: &session,
            accepts_commands: *app_state.get() == AppState::Running,
        };
        let mut commands = Vec::new();
        if let Some(response) = handle_rpc_request(&request, &context, &mut commands) {
            rpc_interface.queue_response(response);
        }

        for command in commands {
            match command {
                MarkerCommand::Focus(id) => {
                    focus_events.write(FocusMarkerEvent { id });
                }
                MarkerCommand::Dismiss => {
                    dismiss_events.write(DismissSelectionEvent);
                }
            }
        }
    }
}

/// Handle one RPC request. Side effects are pushed onto `commands`; a
/// response is produced only for requests that carry an ID.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    commands: &mut Vec<MarkerCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_markers" => Ok(markers_json(context.markers)),
        "get_selection" => Ok(serde_json::json!({ "id": context.selection.selected() })),
        "get_scene" => Ok(scene_json(context.session)),
        "focus_marker" | "clear_selection" if !context.accepts_commands => {
            Err(RpcError::not_ready(&request.method))
        }
        "focus_marker" => handle_focus_marker(&request.params, context.markers, commands),
        "clear_selection" => {
            commands.push(MarkerCommand::Dismiss);
            Ok(serde_json::json!({ "success": true }))
        }
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({ "method": request.method })),
            })
        }
    };

    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(create_error_response(id, error)),
    }
}

fn handle_focus_marker(
    params: &serde_json::Value,
    markers: &DiscoveredMarkers,
    commands: &mut Vec<MarkerCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct FocusMarkerParams {
        id: String,
    }

    let focus_params = serde_json::from_value::<FocusMarkerParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;

    let marker = resolve_marker(markers, &focus_params.id)
        .map_err(|err| RpcError::invalid_params(&err.to_string()))?;

    commands.push(MarkerCommand::Focus(marker.id.clone()));
    info!("Focus requested over RPC: {}", marker.name);

    Ok(serde_json::json!({
        "success": true,
        "id": marker.id
    }))
}

fn scene_json(session: &ViewerSession) -> serde_json::Value {
    let Some(normalized) = session.normalized else {
        return serde_json::json!({ "loaded": false });
    };
    let sphere = normalized.sphere;
    serde_json::json!({
        "loaded": true,
        "has_geometry": normalized.has_geometry,
        "center": sphere.ground_center().to_array(),
        "radius": sphere.radius,
        "ground_offset": normalized.ground_offset,
    })
}

fn markers_json(markers: &DiscoveredMarkers) -> serde_json::Value {
    let payload: Vec<MarkerPayload> = markers.markers.iter().map(MarkerPayload::from).collect();
    serde_json::json!({ "markers": payload })
}

/// Push marker lifecycle changes to the frontend.
fn forward_marker_notifications(
    mut discovered: EventReader<MarkersDiscovered>,
    mut selection_changes: EventReader<SelectionChanged>,
    mut arrivals: EventReader<MarkerArrived>,
    markers: Res<DiscoveredMarkers>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if discovered.read().last().is_some() {
        rpc_interface.send_notification("markers_discovered", markers_json(&markers));
    }

    for change in selection_changes.read() {
        match change {
            SelectionChanged::Selected(id) => {
                rpc_interface.send_notification("marker_selected", serde_json::json!({ "id": id }));
            }
            SelectionChanged::Cleared => {
                rpc_interface.send_notification("selection_cleared", serde_json::json!({}));
            }
        }
    }

    for arrival in arrivals.read() {
        rpc_interface.send_notification(
            "flight_complete",
            serde_json::json!({ "id": arrival.id }),
        );
    }
}

fn create_error_response(id: serde_json::Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    /// Server error for marker commands sent before the scene is running.
    pub fn not_ready(method: &str) -> Self {
        Self {
            code: -32002,
            message: "Viewer not ready".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::bounds::BoundingSphere;
    use crate::engine::scene::normalizer::NormalizedScene;
    use crate::tools::markers::marker::Marker;

    fn markers() -> DiscoveredMarkers {
        DiscoveredMarkers {
            markers: vec![Marker {
                id: "entity-3".to_string(),
                name: "Power Aisle".to_string(),
                center: Vec3::new(1.0, 2.0, 3.0),
                radius: 4.0,
                description: Some("Corridor".to_string()),
                image: Some("images/power_aisle.jpg".to_string()),
            }],
        }
    }

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        }
    }

    fn call_with(
        req: &RpcRequest,
        selection: &SelectionState,
        session: &ViewerSession,
        accepts_commands: bool,
    ) -> (RpcResponse, Vec<MarkerCommand>) {
        let markers = markers();
        let context = RpcContext {
            markers: &markers,
            selection,
            session,
            accepts_commands,
        };
        let mut commands = Vec::new();
        let response = handle_rpc_request(req, &context, &mut commands).unwrap();
        (response, commands)
    }

    fn call(req: &RpcRequest, selection: &SelectionState) -> (RpcResponse, Vec<MarkerCommand>) {
        call_with(req, selection, &ViewerSession::default(), true)
    }

    #[test]
    fn test_get_markers_lists_payloads() {
        let (response, commands) =
            call(&request("get_markers", serde_json::Value::Null), &SelectionState::default());

        let result = response.result.unwrap();
        assert_eq!(result["markers"][0]["id"], "entity-3");
        assert_eq!(result["markers"][0]["name"], "Power Aisle");
        assert_eq!(result["markers"][0]["center"], serde_json::json!([1.0, 2.0, 3.0]));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_get_selection() {
        let mut selection = SelectionState::default();
        let (response, _) = call(&request("get_selection", serde_json::Value::Null), &selection);
        assert_eq!(response.result.unwrap()["id"], serde_json::Value::Null);

        selection.select("entity-3");
        let (response, _) = call(&request("get_selection", serde_json::Value::Null), &selection);
        assert_eq!(response.result.unwrap()["id"], "entity-3");
    }

    #[test]
    fn test_focus_marker_queues_focus() {
        let (response, commands) = call(
            &request("focus_marker", serde_json::json!({ "id": "entity-3" })),
            &SelectionState::default(),
        );
        assert!(response.error.is_none());
        assert_eq!(commands, vec![MarkerCommand::Focus("entity-3".to_string())]);
    }

    #[test]
    fn test_focus_marker_rejects_bad_params() {
        let selection = SelectionState::default();
        let (missing, commands) =
            call(&request("focus_marker", serde_json::json!({})), &selection);
        assert_eq!(missing.error.unwrap().code, -32602);
        assert!(commands.is_empty());

        let (unknown, commands) = call(
            &request("focus_marker", serde_json::json!({ "id": "entity-99" })),
            &selection,
        );
        assert_eq!(unknown.error.unwrap().code, -32602);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_clear_selection_and_unknown_method() {
        let selection = SelectionState::default();
        let (_, commands) = call(&request("clear_selection", serde_json::Value::Null), &selection);
        assert_eq!(commands, vec![MarkerCommand::Dismiss]);

        let (response, _) = call(&request("teleport", serde_json::Value::Null), &selection);
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_notification_runs_without_response() {
        let mut req = request("clear_selection", serde_json::Value::Null);
        req.id = None;
        let markers = markers();
        let session = ViewerSession::default();
        let context = RpcContext {
            markers: &markers,
            selection: &SelectionState::default(),
            session: &session,
            accepts_commands: true,
        };
        let mut commands = Vec::new();
        let response = handle_rpc_request(&req, &context, &mut commands);
        assert!(response.is_none());
        assert_eq!(commands, vec![MarkerCommand::Dismiss]);
    }

    #[test]
    fn test_marker_commands_rejected_while_loading() {
        let selection = SelectionState::default();
        let session = ViewerSession::default();

        let (focus, commands) = call_with(
            &request("focus_marker", serde_json::json!({ "id": "entity-3" })),
            &selection,
            &session,
            false,
        );
        assert_eq!(focus.error.unwrap().code, -32002);
        assert!(focus.result.is_none());
        assert!(commands.is_empty());

        let (clear, commands) = call_with(
            &request("clear_selection", serde_json::Value::Null),
            &selection,
            &session,
            false,
        );
        assert_eq!(clear.error.unwrap().code, -32002);
        assert!(commands.is_empty());

        // Queries still answer.
        let (markers, _) = call_with(
            &request("get_markers", serde_json::Value::Null),
            &selection,
            &session,
            false,
        );
        assert!(markers.error.is_none());
    }

    #[test]
    fn test_get_scene_reports_grounding() {
        let selection = SelectionState::default();
        let (pending, _) = call_with(
            &request("get_scene", serde_json::Value::Null),
            &selection,
            &ViewerSession::default(),
            false,
        );
        assert_eq!(pending.result.unwrap()["loaded"], false);

        let session = ViewerSession {
            normalized: Some(NormalizedScene {
                sphere: BoundingSphere::new(Vec3::new(1.0, 5.0, 2.0), 4.0),
                ground_offset: -1.0,
                has_geometry: true,
            }),
        };
        let (loaded, _) = call_with(
            &request("get_scene", serde_json::Value::Null),
            &selection,
            &session,
            true,
        );
        let result = loaded.result.unwrap();
        assert_eq!(result["loaded"], true);
        assert_eq!(result["radius"], 4.0);
        assert_eq!(result["ground_offset"], -1.0);
        assert_eq!(result["center"], serde_json::json!([1.0, 0.0, 2.0]));
    }

    #[test]
    fn test_request_params_default_to_null() {
        let parsed: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_markers","id":7}"#).unwrap();
        assert_eq!(parsed.params, serde_json::Value::Null);
        assert_eq!(parsed.id, Some(serde_json::json!(7)));
    }
}
