//! Error types shared across the workspace

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    /// Audio capture or playback failed
    #[error("Audio error: {0}")]
    Audio(String),

    /// A capability-gated facility is not available
    #[error("Capability unavailable: {0}")]
    Capability(String),

    /// Malformed data at an I/O boundary
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, CoreError>;
