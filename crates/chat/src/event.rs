//! Chat events
//!
//! Broadcast by the store so transports (the chat WebSocket) can forward
//! delivery progress without polling session state.

use uuid::Uuid;

/// Events emitted by the chat store
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A session was created
    SessionCreated { session_id: Uuid },
    /// A user message was appended
    UserMessage { session_id: Uuid, text: String },
    /// An assistant slot was reserved and reveal is starting
    RevealStarted { session_id: Uuid, index: usize },
    /// The revealed prefix of the assistant message grew
    RevealChunk {
        session_id: Uuid,
        index: usize,
        /// Current revealed prefix (full replacement, not a delta)
        text: String,
    },
    /// The assistant message was committed in full
    MessageFinalized {
        session_id: Uuid,
        index: usize,
        text: String,
    },
}

impl ChatEvent {
    /// Session this event belongs to
    pub fn session_id(&self) -> Uuid {
        match self {
            ChatEvent::SessionCreated { session_id }
            | ChatEvent::UserMessage { session_id, .. }
            | ChatEvent::RevealStarted { session_id, .. }
            | ChatEvent::RevealChunk { session_id, .. }
            | ChatEvent::MessageFinalized { session_id, .. } => *session_id,
        }
    }
}
