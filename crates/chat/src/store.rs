//! Chat store: session lifecycle and streaming delivery

use coach_agent_config::ChatSettings;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::ChatError;
use crate::event::ChatEvent;
use crate::session::{ChatSession, SessionSnapshot};

/// Broadcast buffer for chat events; slow subscribers observe `Lagged`
/// rather than blocking delivery.
const EVENT_BUFFER: usize = 256;

/// Process-wide chat session store
pub struct ChatStore {
    settings: ChatSettings,
    sessions: RwLock<HashMap<Uuid, Arc<ChatSession>>>,
    /// Insertion order, for stable listing and session numbering
    order: RwLock<Vec<Uuid>>,
    /// Currently selected session (presentation state; reveals do not read it)
    active: RwLock<Option<Uuid>>,
    created_count: AtomicUsize,
    events: broadcast::Sender<ChatEvent>,
}

impl ChatStore {
    /// Create a store with the given delivery settings
    pub fn new(settings: ChatSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            settings,
            sessions: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            active: RwLock::new(None),
            created_count: AtomicUsize::new(0),
            events,
        }
    }

    /// Subscribe to chat events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Create a new session and make it active
    ///
    /// Titles are numbered in creation order ("Session 1", "Session 2", ...);
    /// ids are fresh v4 uuids and never reused.
    pub fn create(&self) -> Result<Arc<ChatSession>, ChatError> {
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.settings.max_sessions {
            return Err(ChatError::Capacity(self.settings.max_sessions));
        }

        let number = self.created_count.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Arc::new(ChatSession::new(format!("Session {number}")));
        sessions.insert(session.id, session.clone());
        self.order.write().push(session.id);
        *self.active.write() = Some(session.id);
        drop(sessions);

        tracing::info!(session_id = %session.id, title = %session.title, "Created session");
        self.emit(ChatEvent::SessionCreated {
            session_id: session.id,
        });

        Ok(session)
    }

    /// Get a session by id
    pub fn get(&self, id: Uuid) -> Option<Arc<ChatSession>> {
        self.sessions.read().get(&id).cloned()
    }

    /// Snapshots of all sessions in creation order
    pub fn list(&self) -> Vec<SessionSnapshot> {
        let sessions = self.sessions.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| sessions.get(id))
            .map(|s| s.snapshot())
            .collect()
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Select the active session
    pub fn activate(&self, id: Uuid) -> Result<(), ChatError> {
        if !self.sessions.read().contains_key(&id) {
            return Err(ChatError::SessionNotFound(id));
        }
        *self.active.write() = Some(id);
        Ok(())
    }

    /// The active session, if any
    pub fn active(&self) -> Option<Arc<ChatSession>> {
        let id = (*self.active.read())?;
        self.get(id)
    }

    /// Deliver one answer to a session with streaming reveal
    ///
    /// Appends the user message, reserves an assistant slot, then grows that
    /// slot's text in fixed character chunks at a fixed interval before
    /// committing the full string. Holds the session's send lock for the
    /// whole flow, so a concurrent `deliver` on the same session waits for
    /// this one to finalize. The reveal writes to `session` by identity -
    /// changing the store's active session meanwhile affects nothing here.
    pub async fn deliver(&self, session: &Arc<ChatSession>, question: &str, answer: &str) {
        let _guard = session.send_lock.lock().await;

        session.push_user(question);
        self.emit(ChatEvent::UserMessage {
            session_id: session.id,
            text: question.to_string(),
        });

        let index = session.reserve_assistant();
        self.emit(ChatEvent::RevealStarted {
            session_id: session.id,
            index,
        });

        let interval = Duration::from_millis(self.settings.reveal_interval_ms);
        let chunk = self.settings.reveal_chunk_chars.max(1);
        let total_chars = answer.chars().count();

        let mut revealed = 0;
        while revealed < total_chars {
            tokio::time::sleep(interval).await;
            let prefix = char_prefix(answer, revealed);
            session.reveal_prefix(index, prefix);
            self.emit(ChatEvent::RevealChunk {
                session_id: session.id,
                index,
                text: prefix.to_string(),
            });
            revealed += chunk;
        }

        session.finalize(index, answer);
        self.emit(ChatEvent::MessageFinalized {
            session_id: session.id,
            index,
            text: answer.to_string(),
        });

        tracing::debug!(
            session_id = %session.id,
            index,
            chars = total_chars,
            "Answer delivered"
        );
    }

    fn emit(&self, event: ChatEvent) {
        // Send only fails when no subscriber is listening, which is fine.
        let _ = self.events.send(event);
    }
}

/// Prefix of `text` containing at most `chars` characters, on a UTF-8
/// boundary
fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
