//! HTTP and WebSocket server for the coach agent
//!
//! Exposes the chat store over REST, the read-only context providers at
//! their collaborator boundary, and a per-session WebSocket that carries
//! questions and microphone audio in and reveal chunks, transcripts, and
//! response audio out.

pub mod capture;
pub mod coach;
pub mod context;
pub mod error;
pub mod http;
pub mod state;
pub mod websocket;

pub use context::ContextProviders;
pub use error::ServerError;
pub use http::create_router;
pub use state::AppState;
