//! Chat session state

use chrono::{DateTime, Utc};
use coach_agent_core::{ChatMessage, MessageRole, Persona};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One conversation session
///
/// Field locks are held only for the individual mutation; `send_lock` is the
/// per-session serialization point for delivery and is held across an entire
/// compose → reveal → finalize flow.
pub struct ChatSession {
    /// Session ID
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Selected personas, ordered, never empty
    personas: RwLock<Vec<Persona>>,
    /// Speak finalized answers aloud
    speaking: RwLock<bool>,
    /// Message history
    messages: RwLock<Vec<ChatMessage>>,
    /// Serializes deliveries on this session
    pub(crate) send_lock: Mutex<()>,
}

/// Serializable view of a session for transport boundaries
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub title: String,
    pub personas: Vec<Persona>,
    pub speaking: bool,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a session with the default persona, speaking enabled, and an
    /// empty history
    pub(crate) fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            created_at: Utc::now(),
            personas: RwLock::new(vec![Persona::default()]),
            speaking: RwLock::new(true),
            messages: RwLock::new(Vec::new()),
            send_lock: Mutex::new(()),
        }
    }

    /// Current persona selection
    pub fn personas(&self) -> Vec<Persona> {
        self.personas.read().clone()
    }

    /// Replace the persona selection
    ///
    /// Duplicates are dropped, first occurrence wins. An empty selection is
    /// ignored and the prior set kept; returns whether the replacement was
    /// applied.
    pub fn replace_personas(&self, selection: Vec<Persona>) -> bool {
        let mut deduped: Vec<Persona> = Vec::with_capacity(selection.len());
        for persona in selection {
            if !deduped.contains(&persona) {
                deduped.push(persona);
            }
        }

        if deduped.is_empty() {
            tracing::warn!(session_id = %self.id, "Ignoring empty persona selection");
            return false;
        }

        *self.personas.write() = deduped;
        true
    }

    /// Is speech output enabled
    pub fn speaking(&self) -> bool {
        *self.speaking.read()
    }

    /// Flip the speech-output toggle; returns the new value
    pub fn toggle_speaking(&self) -> bool {
        let mut speaking = self.speaking.write();
        *speaking = !*speaking;
        *speaking
    }

    /// Copy of the message history
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().clone()
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }

    /// Snapshot for transport
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            title: self.title.clone(),
            personas: self.personas(),
            speaking: self.speaking(),
            messages: self.messages(),
            created_at: self.created_at,
        }
    }

    /// Append a user message; returns its index
    pub(crate) fn push_user(&self, text: &str) -> usize {
        let mut messages = self.messages.write();
        messages.push(ChatMessage::user(text));
        messages.len() - 1
    }

    /// Reserve an empty assistant message for reveal; returns its index
    pub(crate) fn reserve_assistant(&self) -> usize {
        let mut messages = self.messages.write();
        messages.push(ChatMessage::assistant_placeholder());
        messages.len() - 1
    }

    /// Grow the revealed prefix of the message at `index`
    ///
    /// Prefix writes never shrink the text; an out-of-order write is dropped.
    pub(crate) fn reveal_prefix(&self, index: usize, prefix: &str) {
        let mut messages = self.messages.write();
        let Some(message) = messages.get_mut(index) else {
            tracing::warn!(session_id = %self.id, index, "Reveal target out of range");
            return;
        };
        debug_assert_eq!(message.role, MessageRole::Assistant);
        if prefix.len() < message.text.len() {
            tracing::warn!(session_id = %self.id, index, "Dropping out-of-order reveal write");
            return;
        }
        message.text = prefix.to_string();
    }

    /// Commit the full message text
    pub(crate) fn finalize(&self, index: usize, text: &str) {
        self.reveal_prefix(index, text);
    }
}
