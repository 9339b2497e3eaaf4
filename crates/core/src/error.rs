//! Error types for the Lookout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all Lookout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Search loop errors ---
    #[error("Finder error: {0}")]
    Finder(#[from] FinderError),

    // --- Camera errors ---
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    // --- Remote vision errors ---
    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors reported synchronously by the search loop and the camera assistant.
///
/// Per-cycle capture and recognition failures never surface here; the loop
/// absorbs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Camera is not ready")]
    CameraNotReady,

    #[error("A request is already in progress")]
    Busy,
}

#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Camera not ready: {0}")]
    NotReady(String),

    #[error("Capture failed: {0}")]
    Failed(String),

    #[error("Image encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Relay rejected request: {message} (status: {status_code})")]
    Rejected { status_code: u16, message: String },

    #[error("Malformed relay response: {0}")]
    Protocol(String),

    #[error("Vision backend failed: {0}")]
    Backend(String),
}

impl RecognitionError {
    /// Whether this failure was a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RecognitionError::Timeout { .. })
    }
}
