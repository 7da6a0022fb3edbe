//! HTTP handlers for the room API.
//!
//! Responses use the `{"code": <status>, "data": <value>}` envelope the
//! existing clients expect; the HTTP status mirrors `code`.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::rooms::RoomError;
use crate::state::AppState;

// --- Request types ---

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub pwd: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetConfigRequest {
    pub pwd: Option<String>,
    pub config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct PublishEventRequest {
    pub pwd: Option<String>,
    pub event: Option<String>,
    pub data: Option<String>,
}

// --- Error mapping ---

/// Handler error carrying the status to report; rendered with the same
/// JSON envelope as success responses.
#[derive(Debug)]
pub struct ApiError(pub StatusCode);

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotFound => ApiError(StatusCode::NOT_FOUND),
            RoomError::Forbidden => ApiError(StatusCode::FORBIDDEN),
            RoomError::InvalidInput => ApiError(StatusCode::BAD_REQUEST),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = self.0.canonical_reason().unwrap_or("");
        (
            self.0,
            Json(json!({ "code": self.0.as_u16(), "data": reason })),
        )
            .into_response()
    }
}

fn ok_json(data: serde_json::Value) -> Json<serde_json::Value> {
    Json(json!({ "code": 200, "data": data }))
}

/// Room ids are opaque tokens: non-empty and free of path separators.
/// Percent-encoded separators survive axum's path decoding, so this is
/// checked even though the router already splits on `/`.
fn validate_room_id(id: &str) -> Result<(), ApiError> {
    if id.is_empty() || id.contains('/') {
        return Err(RoomError::InvalidInput.into());
    }
    Ok(())
}

// --- Handlers ---

/// POST /api/createRoom — Create a room protected by the given password.
pub async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<CreateRoomRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pwd = body
        .pwd
        .filter(|p| !p.is_empty())
        .ok_or(ApiError(StatusCode::BAD_REQUEST))?;

    let room_id = state.registry.create_room(&pwd);
    Ok(ok_json(json!({ "roomId": room_id })))
}

/// GET /api/config/{room} — Return the room's current config document.
pub async fn get_config(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_room_id(&room)?;
    let config = state.registry.with_room(&room, |r| r.config().clone())?;
    Ok(ok_json(config))
}

/// POST /api/config/{room} — Replace the room's config wholesale.
/// Requires the room password; refreshes the eviction clock.
pub async fn set_config(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(body): Json<SetConfigRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_room_id(&room)?;
    let pwd = body
        .pwd
        .filter(|p| !p.is_empty())
        .ok_or(ApiError(StatusCode::BAD_REQUEST))?;
    let config = body.config.ok_or(ApiError(StatusCode::BAD_REQUEST))?;

    state.registry.with_room_mut(&room, |r| {
        if !r.check_password(&pwd) {
            return Err(RoomError::Forbidden);
        }
        r.set_config(config);
        Ok(())
    })??;

    Ok(ok_json(json!("Ok")))
}

/// POST /api/event/{room} — Broadcast an event to every listener.
/// A broadcast reaching zero live listeners is still a success.
pub async fn publish_event(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(body): Json<PublishEventRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_room_id(&room)?;
    let pwd = body
        .pwd
        .filter(|p| !p.is_empty())
        .ok_or(ApiError(StatusCode::BAD_REQUEST))?;
    let data = body.data.unwrap_or_default();

    state.registry.with_room(&room, |r| {
        if !r.check_password(&pwd) {
            return Err(RoomError::Forbidden);
        }
        r.broadcast(body.event.as_deref(), &data);
        Ok(())
    })??;

    Ok(ok_json(json!("Ok")))
}

/// GET /api/listen/{room} — Open a long-lived SSE stream. The response
/// body stays open until the client disconnects or the room is evicted.
pub async fn listen(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Response, ApiError> {
    validate_room_id(&room)?;
    let stream = state.registry.subscribe(&room)?;

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(stream))
        .map_err(|_| ApiError(StatusCode::INTERNAL_SERVER_ERROR))
}

/// GET /api/__info__ — Diagnostic count of live rooms.
pub async fn info(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let snapshot = state.registry.snapshot();
    Ok(ok_json(serde_json::to_value(snapshot).unwrap_or_default()))
}
