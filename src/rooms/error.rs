use thiserror::Error;

/// Errors surfaced to the boundary layer by room operations.
///
/// Per-listener delivery failures are deliberately absent: they are
/// swallowed inside the fan-out loops and never abort an operation
/// affecting other listeners.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// Unknown room id.
    #[error("room not found")]
    NotFound,

    /// Password mismatch on an admin operation.
    #[error("password mismatch")]
    Forbidden,

    /// Malformed input (empty id, path separator in id, empty password).
    #[error("invalid input")]
    InvalidInput,
}

/// A single listener's transport is no longer writable.
/// Callers in fan-out loops catch and ignore this.
#[derive(Debug, Error)]
#[error("listener transport closed")]
pub struct DeliveryFailure;
