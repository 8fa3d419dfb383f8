//! Transcript events produced by the listener pipeline

use serde::{Deserialize, Serialize};

/// One transcription event
///
/// The network variant can emit many of these per capture session (interim
/// transcripts followed by finals); the local one-shot variant emits at most
/// one, always final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    /// Transcribed text
    pub text: String,
    /// Whether this transcript is final for the utterance
    #[serde(default)]
    pub is_final: bool,
}

impl TranscriptEvent {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}
