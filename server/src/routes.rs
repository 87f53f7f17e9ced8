//! HTTP route handlers for the Listkeeper server.
//!
//! This module provides the HTTP API endpoints:
//!
//! - `GET /todos` - Full current list
//! - `POST /todos` - Create a todo
//! - `PATCH /todos/{id}/done` - Mark a todo completed
//! - `DELETE /todos/{id}` - Delete a todo
//! - `POST /todos/reorder` - Reconcile a client-supplied ordering
//! - `GET /ws` - WebSocket live-update subscription
//! - `GET /health` - Health check
//!
//! # Architecture
//!
//! All routes share application state through [`AppState`], which contains
//! the [`TodoStore`] and the [`ChangeBroadcaster`]. Each mutating handler
//! performs one store operation and then broadcasts the resulting change to
//! every connected subscriber. There is no locking between requests; two
//! racing writers follow last-write-wins on the data file.
//!
//! # Example
//!
//! ```rust,no_run
//! use listkeeper_server::routes::{create_router, AppState};
//! use listkeeper_store::TodoStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::new(TodoStore::new("todos.json"));
//!     let app = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

use axum::{
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use listkeeper_store::TodoStore;

use crate::broadcast::{ChangeBroadcaster, ChangeEvent};
use crate::error::ApiError;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all route handlers.
///
/// Cloned for each request handler; the store clone shares the same data
/// file and the broadcaster clone shares the same channel.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The persisted todo collection.
    pub store: TodoStore,

    /// Fan-out hub for live-update subscribers.
    pub broadcaster: ChangeBroadcaster,

    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Creates application state around the given store.
    #[must_use]
    pub fn new(store: TodoStore) -> Self {
        Self {
            store,
            broadcaster: ChangeBroadcaster::new(),
            start_time: Instant::now(),
        }
    }

    /// Creates application state with a custom broadcaster.
    ///
    /// Useful for testing or when a custom channel capacity is needed.
    #[must_use]
    pub fn with_broadcaster(store: TodoStore, broadcaster: ChangeBroadcaster) -> Self {
        Self {
            store,
            broadcaster,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Creates the application router with all API routes configured.
///
/// Static asset serving is layered on separately by the binary so that the
/// API surface stays self-contained for tests.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(get_todos).post(post_todos))
        .route("/todos/reorder", post(post_reorder))
        .route("/todos/{id}/done", patch(patch_done))
        .route("/todos/{id}", delete(delete_todo))
        .route("/ws", get(get_ws))
        .route("/health", get(get_health))
        .with_state(state)
}

/// Parses a path segment as a todo id.
///
/// A non-numeric id is a `400`, distinct from a well-formed id that simply
/// does not exist (`404`).
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation("Invalid ID"))
}

// ============================================================================
// GET /todos - List
// ============================================================================

/// GET /todos - Returns the full current list in persisted order.
async fn get_todos(State(state): State<AppState>) -> Result<Response, ApiError> {
    let todos = state.store.list().await?;
    trace!(count = todos.len(), "Listed todos");
    Ok(Json(todos).into_response())
}

// ============================================================================
// POST /todos - Create
// ============================================================================

/// POST /todos - Creates a todo from `{title}`.
///
/// Rejects with `400` when the title is missing, not a string, or empty.
/// On success persists the new item and broadcasts `TODO_ADDED`.
async fn post_todos(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let title = match body.get("title").and_then(Value::as_str) {
        Some(title) if !title.is_empty() => title.to_owned(),
        _ => return Err(ApiError::validation("Title is required")),
    };

    let todo = state.store.add(title).await?;
    info!(id = todo.id, "Todo created");
    state.broadcaster.broadcast(ChangeEvent::Added(todo.clone()));

    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

// ============================================================================
// PATCH /todos/{id}/done - Mark done
// ============================================================================

/// PATCH /todos/{id}/done - Marks a todo completed.
///
/// `400` for a malformed id, `404` when no todo has the id. On success
/// persists the flip and broadcasts `TODO_UPDATED`. Completing an already
/// completed todo succeeds.
async fn patch_done(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let Some(todo) = state.store.mark_done(id).await? else {
        debug!(id, "Mark done on unknown id");
        return Err(ApiError::not_found("Todo not found"));
    };

    info!(id, "Todo marked done");
    state
        .broadcaster
        .broadcast(ChangeEvent::Updated(todo.clone()));

    Ok(Json(todo).into_response())
}

// ============================================================================
// DELETE /todos/{id} - Delete
// ============================================================================

/// Response body for a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always true; failures are reported through error responses.
    pub success: bool,
}

/// DELETE /todos/{id} - Removes a todo.
///
/// `400` for a malformed id, `404` when no todo has the id. On success
/// persists the removal and broadcasts `TODO_DELETED` carrying just the id.
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    if !state.store.remove(id).await? {
        debug!(id, "Delete on unknown id");
        return Err(ApiError::not_found("Todo not found"));
    }

    info!(id, "Todo deleted");
    state.broadcaster.broadcast(ChangeEvent::Deleted { id });

    Ok(Json(DeleteResponse { success: true }).into_response())
}

// ============================================================================
// POST /todos/reorder - Reorder
// ============================================================================

/// POST /todos/reorder - Reconciles `{orderedIds: [...]}` against the store.
///
/// Rejects with `400` when `orderedIds` is missing or not an array. Ids
/// that do not match any todo are silently ignored; todos omitted from the
/// input keep their relative order after all explicitly ordered items. On
/// success broadcasts `TODOS_REORDERED` with the entire resulting list.
async fn post_reorder(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let Some(raw_ids) = body.get("orderedIds").and_then(Value::as_array) else {
        return Err(ApiError::validation("orderedIds array is required"));
    };

    // Non-numeric entries cannot match any id and are dropped like unknown
    // ids, matching the lookup-removal reconciliation policy.
    let ordered_ids: Vec<u64> = raw_ids.iter().filter_map(Value::as_u64).collect();

    let todos = state.store.reorder(&ordered_ids).await?;
    info!(count = todos.len(), "Todos reordered");
    state
        .broadcaster
        .broadcast(ChangeEvent::Reordered(todos.clone()));

    Ok(Json(todos).into_response())
}

// ============================================================================
// GET /ws - WebSocket Subscription
// ============================================================================

/// GET /ws - WebSocket live-update subscription endpoint.
///
/// Once connected, the subscriber receives every broadcast change event as
/// a JSON text message, verbatim and unfiltered. Missed events are not
/// replayed; a client that connects late starts from whatever `GET /todos`
/// returned at startup. Reconnection is the client's responsibility.
async fn get_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    info!("WebSocket client connecting");
    ws.on_upgrade(move |socket| handle_websocket(socket, state.broadcaster))
}

/// Handles an established WebSocket connection.
///
/// Subscribes to the change broadcaster and forwards every event to the
/// client until either side disconnects.
async fn handle_websocket(socket: axum::extract::ws::WebSocket, broadcaster: ChangeBroadcaster) {
    use axum::extract::ws::Message;
    use futures_util::{SinkExt, StreamExt};

    let (mut sender, mut receiver) = socket.split();
    let mut event_rx = broadcaster.subscribe();

    info!("WebSocket client connected");

    // Forward broadcast events to the client.
    let forward_task = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if let Err(err) = sender.send(Message::Text(json.into())).await {
                            debug!(error = %err, "Failed to send event to WebSocket client");
                            break;
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "Failed to serialize change event");
                    }
                },
                Err(RecvError::Lagged(count)) => {
                    // The gap is not replayed; the client re-fetches if it cares.
                    warn!(skipped = count, "WebSocket client lagged, skipped events");
                }
                Err(RecvError::Closed) => {
                    debug!("Change broadcaster closed");
                    break;
                }
            }
        }
    });

    // Wait for the client to disconnect. Incoming messages are ignored.
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client sent close frame");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                debug!(error = %err, "WebSocket error");
                break;
            }
        }
    }

    forward_task.abort();
    info!("WebSocket client disconnected");
}

// ============================================================================
// GET /health - Health Check
// ============================================================================

/// Response body for the health check endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status (always "ok" if responding).
    pub status: String,

    /// Number of active WebSocket connections.
    pub connections: usize,

    /// Server uptime in seconds.
    pub uptime_seconds: u64,
}

/// GET /health - Health check endpoint.
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        connections: state.broadcaster.subscriber_count(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Tests
// ============================================================================
