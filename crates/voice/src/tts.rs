//! HTTP speech-synthesis backend
//!
//! Posts answer text to the configured synthesis service and returns the
//! audio payload. The service contract is plain: JSON string in, encoded
//! audio bytes out.

use coach_agent_core::AudioClip;

use crate::VoiceError;

/// Fallback MIME type when the service omits Content-Type
const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// HTTP TTS backend configuration
#[derive(Debug, Clone)]
pub struct HttpTtsConfig {
    /// Synthesis service URL
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

/// HTTP TTS backend
pub struct HttpTts {
    config: HttpTtsConfig,
    client: reqwest::Client,
}

impl HttpTts {
    /// Create a new HTTP TTS backend
    pub fn new(config: HttpTtsConfig) -> Result<Self, VoiceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VoiceError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Endpoint URL for logging
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Synthesize `text` into an audio clip
    pub async fn synthesize(&self, text: &str) -> Result<AudioClip, VoiceError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&text)
            .send()
            .await
            .map_err(|e| VoiceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VoiceError::Http(format!(
                "Speech service returned {}",
                response.status()
            )));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VoiceError::Decode(e.to_string()))?;

        if bytes.is_empty() {
            return Err(VoiceError::Decode("Empty audio payload".to_string()));
        }

        Ok(AudioClip::new(bytes.to_vec(), mime))
    }
}
