//! Chat store error types

use thiserror::Error;
use uuid::Uuid;

/// Chat store error
#[derive(Debug, Error)]
pub enum ChatError {
    /// No session with the given id
    #[error("Unknown session: {0}")]
    SessionNotFound(Uuid),

    /// Store is at its configured session capacity
    #[error("Max sessions reached ({0})")]
    Capacity(usize),
}
