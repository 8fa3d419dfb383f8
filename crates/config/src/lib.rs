//! Layered configuration for the coach agent
//!
//! Settings are resolved in priority order:
//! env vars > config/{env}.toml > config/default.toml > built-in defaults.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{load_settings, ChatSettings, ServerSettings, Settings, VoiceSettings};
