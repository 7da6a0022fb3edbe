use std::sync::Arc;

use crate::rooms::RoomRegistry;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide room registry
    pub registry: Arc<RoomRegistry>,
}
