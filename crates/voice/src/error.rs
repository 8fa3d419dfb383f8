//! Voice pipeline error types
//!
//! These never cross the pipeline boundary; they exist so fallback decisions
//! have something concrete to log.

use thiserror::Error;

/// Voice pipeline error
#[derive(Debug, Error)]
pub enum VoiceError {
    /// WebSocket connection to the transcription relay failed
    #[error("Relay connection failed: {0}")]
    Connect(String),

    /// Speech-synthesis HTTP request failed
    #[error("Speech request failed: {0}")]
    Http(String),

    /// Response payload was unusable
    #[error("Bad speech payload: {0}")]
    Decode(String),

    /// Audio capture could not be acquired
    #[error("Audio capture failed: {0}")]
    Capture(String),

    /// Audio playback failed
    #[error("Playback failed: {0}")]
    Playback(String),
}
