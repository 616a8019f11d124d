//! Error Types

use thiserror::Error;

/// Errors returned to the host by the CLA event handlers.
///
/// GitHub failures are logged and absorbed inside the handlers, so only
/// malformed input reaches the caller.
#[derive(Debug, Error)]
pub enum ClaError {
    /// The upstream event is malformed and cannot be processed
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

pub type Result<T> = std::result::Result<T, ClaError>;
