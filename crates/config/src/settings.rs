//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Voice backend endpoints and timeouts
    #[serde(default)]
    pub voice: VoiceSettings,

    /// Chat store and streaming reveal configuration
    #[serde(default)]
    pub chat: ChatSettings,
}

/// HTTP/WebSocket server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin for the frontend
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Voice pipeline configuration
///
/// Both endpoints are optional: an absent `tts_endpoint` routes speech
/// output to the local synthesizer (or a no-op), and an absent `asr_relay`
/// routes speech input to the local recognizer. Absence is the capability
/// signal, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Speech-synthesis service URL (POST text, receive audio bytes)
    #[serde(default)]
    pub tts_endpoint: Option<String>,

    /// Streaming transcription relay WebSocket URL
    #[serde(default)]
    pub asr_relay: Option<String>,

    /// Network TTS request timeout in milliseconds
    #[serde(default = "default_tts_timeout_ms")]
    pub tts_timeout_ms: u64,
}

fn default_tts_timeout_ms() -> u64 {
    30000
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            tts_endpoint: None,
            asr_relay: None,
            tts_timeout_ms: default_tts_timeout_ms(),
        }
    }
}

/// Chat store and streaming reveal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Characters revealed per streaming step
    #[serde(default = "default_reveal_chunk_chars")]
    pub reveal_chunk_chars: usize,

    /// Delay between reveal steps in milliseconds
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,

    /// Maximum concurrent sessions in the store
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_reveal_chunk_chars() -> usize {
    4
}

fn default_reveal_interval_ms() -> u64 {
    8
}

fn default_max_sessions() -> usize {
    100
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reveal_chunk_chars: default_reveal_chunk_chars(),
            reveal_interval_ms: default_reveal_interval_ms(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.reveal_chunk_chars == 0 {
            return Err(ConfigError::invalid(
                "chat.reveal_chunk_chars",
                "Reveal chunk must be at least one character",
            ));
        }

        if self.chat.max_sessions == 0 {
            return Err(ConfigError::invalid(
                "chat.max_sessions",
                "At least one session must be allowed",
            ));
        }

        if let Some(endpoint) = &self.voice.tts_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::invalid(
                    "voice.tts_endpoint",
                    format!("Expected an http(s) URL, got {endpoint}"),
                ));
            }
        }

        if let Some(relay) = &self.voice.asr_relay {
            if !relay.starts_with("ws://") && !relay.starts_with("wss://") {
                return Err(ConfigError::invalid(
                    "voice.asr_relay",
                    format!("Expected a ws(s) URL, got {relay}"),
                ));
            }
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: env vars (prefix `COACH`, `__` separator) > `config/{env}.toml`
/// > `config/default.toml` > built-in defaults. Missing files are fine;
/// invalid values are not.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

    if let Some(env) = env {
        builder = builder.add_source(File::with_name(&format!("config/{env}")).required(false));
    }

    let settings: Settings = builder
        .add_source(Environment::with_prefix("COACH").separator("__"))
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}
