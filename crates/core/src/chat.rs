//! Chat message and persona types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message in a chat session
///
/// Text is mutable only while the message is the session's streaming tail;
/// once finalized it is never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    pub ts: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            ts: Utc::now(),
        }
    }

    /// Empty assistant message reserved for streaming reveal
    pub fn assistant_placeholder() -> Self {
        Self {
            role: MessageRole::Assistant,
            text: String::new(),
            ts: Utc::now(),
        }
    }
}

/// Coaching persona selectable per session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    CalmMentor,
    ToughCoach,
    DataAnalyst,
}

impl Persona {
    /// All personas, in display order
    pub const ALL: [Persona; 3] = [Persona::CalmMentor, Persona::ToughCoach, Persona::DataAnalyst];

    /// Display label used in the answer preamble
    pub fn label(&self) -> &'static str {
        match self {
            Persona::CalmMentor => "Calm mentor",
            Persona::ToughCoach => "Tough coach",
            Persona::DataAnalyst => "Data analyst",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_labels() {
        assert_eq!(Persona::CalmMentor.label(), "Calm mentor");
        assert_eq!(Persona::DataAnalyst.to_string(), "Data analyst");
    }

    #[test]
    fn assistant_placeholder_is_empty() {
        let msg = ChatMessage::assistant_placeholder();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.text.is_empty());
    }
}
