//! Transcription relay wire protocol
//!
//! The relay sends JSON text messages; any message carrying a non-empty
//! `text` field is a transcript event. Everything else (status frames,
//! error payloads, malformed JSON) is ignored, not fatal.

use coach_agent_core::TranscriptEvent;

/// Parse one relay message into a transcript event, if it is one
pub fn parse_transcript(payload: &str) -> Option<TranscriptEvent> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    let text = value.get("text")?.as_str()?;
    if text.is_empty() {
        return None;
    }

    let is_final = value
        .get("is_final")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Some(TranscriptEvent {
        text: text.to_string(),
        is_final,
    })
}
