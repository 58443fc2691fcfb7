/// Error types for backend calls and controller operations
use thiserror::Error;

use crate::models::PowerState;

/// Errors returned by the backend client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// `detail` from the response body, or the raw body
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Errors surfaced by the instance controller
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Create was submitted without an image selected
    #[error("An image must be selected before creating an instance")]
    MissingImage,

    /// Terminate was confirmed without a pending confirmation
    #[error("Termination must be confirmed first")]
    ConfirmationRequired,

    /// Polling ran out of attempts before the instance reached the desired state
    #[error("Timed out waiting for instance {instance_id} to become {desired} after {attempts} checks")]
    TimedOut {
        instance_id: String,
        desired: PowerState,
        attempts: u32,
    },

    /// The view that owned the action was dismissed
    #[error("Action on instance {instance_id} was cancelled")]
    Cancelled { instance_id: String },
}
