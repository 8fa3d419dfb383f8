//! Chat session store and streaming answer delivery
//!
//! The store owns every conversation session. All mutation goes through
//! narrow named operations (append message, reveal prefix, toggle flags) so
//! the per-session ordering rules are enforceable in one place:
//! - a session's history is append-only, except the assistant message
//!   currently being revealed, which grows in place until finalized;
//! - sends on one session are serialized - a second `deliver` waits for the
//!   first to finalize;
//! - reveal writes target their session by identity, so switching the
//!   active session mid-reveal cannot redirect them.

pub mod error;
pub mod event;
pub mod session;
pub mod store;

pub use error::ChatError;
pub use event::ChatEvent;
pub use session::{ChatSession, SessionSnapshot};
pub use store::ChatStore;
