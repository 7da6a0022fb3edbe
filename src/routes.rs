use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::api;
use crate::state::AppState;

/// Build the full axum Router with all routes.
/// Non-API GET requests fall through to the static file service.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/api/createRoom", post(api::create_room))
        .route(
            "/api/config/{room}",
            get(api::get_config).post(api::set_config),
        )
        .route("/api/event/{room}", post(api::publish_event))
        .route("/api/listen/{room}", get(api::listen))
        .route("/api/__info__", get(api::info))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
