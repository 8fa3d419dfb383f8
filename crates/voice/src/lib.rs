//! Voice I/O fallback pipelines
//!
//! Two ordered strategy chains over the speech traits in the core crate:
//! - **Speaker** (speech output): network synthesis service, then a local
//!   synthesizer, then silence. Best-effort; failures never reach the
//!   caller.
//! - **Listener** (speech input): streaming network transcription relay,
//!   then a local one-shot recognizer. Backend-initialization failure falls
//!   through to the next strategy; a mid-session socket failure tears down
//!   to idle without retrying.
//!
//! All failures are absorbed here with a log line - the synthesis engine
//! and chat store never observe a voice error.

pub mod error;
pub mod listener;
pub mod relay;
pub mod speaker;
pub mod tts;

pub use error::VoiceError;
pub use listener::{Listener, ListenerBackend, ListenerState};
pub use speaker::{Speaker, SpeechRoute};
pub use tts::{HttpTts, HttpTtsConfig};
