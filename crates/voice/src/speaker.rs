//! Speaker pipeline: speech output with fallback
//!
//! An ordered list of strategies; the first successful attempt wins.
//! `speak` is best-effort and never surfaces an error - a failed network
//! synthesis falls back to the local synthesizer, and with no capability at
//! all the call is a no-op.

use coach_agent_config::VoiceSettings;
use coach_agent_core::{AudioSink, LocalSynthesizer};
use std::sync::Arc;

use crate::tts::{HttpTts, HttpTtsConfig};
use crate::VoiceError;

/// Which strategy actually produced audio for a `speak` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechRoute {
    /// Network synthesis service played through the audio sink
    Network,
    /// Local synthesizer
    Local,
    /// No capability available; nothing audible
    Silent,
}

enum Strategy {
    Network {
        tts: HttpTts,
        sink: Arc<dyn AudioSink>,
    },
    Local {
        synth: Arc<dyn LocalSynthesizer>,
    },
}

impl Strategy {
    fn name(&self) -> &str {
        match self {
            Strategy::Network { .. } => "network",
            Strategy::Local { synth } => synth.name(),
        }
    }

    async fn attempt(&self, text: &str) -> Result<SpeechRoute, VoiceError> {
        match self {
            Strategy::Network { tts, sink } => {
                let clip = tts.synthesize(text).await?;
                sink.play(clip)
                    .await
                    .map_err(|e| VoiceError::Playback(e.to_string()))?;
                Ok(SpeechRoute::Network)
            }
            Strategy::Local { synth } => {
                // At most one local utterance at a time.
                synth.cancel();
                synth
                    .speak(text)
                    .await
                    .map_err(|e| VoiceError::Playback(e.to_string()))?;
                Ok(SpeechRoute::Local)
            }
        }
    }
}

/// Speech-output pipeline
pub struct Speaker {
    strategies: Vec<Strategy>,
}

impl Speaker {
    /// Build the strategy chain from settings and available facilities
    ///
    /// The network strategy exists only when an endpoint is configured and a
    /// sink is present to play its payload; the local strategy only when a
    /// synthesizer capability was supplied.
    pub fn new(
        settings: &VoiceSettings,
        sink: Option<Arc<dyn AudioSink>>,
        local: Option<Arc<dyn LocalSynthesizer>>,
    ) -> Self {
        let mut strategies = Vec::new();

        if let (Some(endpoint), Some(sink)) = (&settings.tts_endpoint, sink) {
            match HttpTts::new(HttpTtsConfig {
                endpoint: endpoint.clone(),
                timeout_ms: settings.tts_timeout_ms,
            }) {
                Ok(tts) => {
                    tracing::info!(endpoint = %tts.endpoint(), "Network speech synthesis enabled");
                    strategies.push(Strategy::Network { tts, sink });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Network speech synthesis unavailable");
                }
            }
        }

        if let Some(synth) = local {
            strategies.push(Strategy::Local { synth });
        }

        Self { strategies }
    }

    /// Speaker with no capability at all; every `speak` is a no-op
    pub fn silent() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Whether any strategy is configured
    pub fn has_backend(&self) -> bool {
        !self.strategies.is_empty()
    }

    /// Speak `text` through the first strategy that succeeds
    pub async fn speak(&self, text: &str) -> SpeechRoute {
        for strategy in &self.strategies {
            match strategy.attempt(text).await {
                Ok(route) => return route,
                Err(e) => {
                    tracing::warn!(
                        backend = strategy.name(),
                        error = %e,
                        "Speech backend failed; falling back"
                    );
                }
            }
        }

        tracing::debug!("No speech capability available; answer stays text-only");
        SpeechRoute::Silent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coach_agent_core::{AudioClip, CoreError};
    use parking_lot::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingSink {
        played: Mutex<Vec<AudioClip>>,
    }

    #[async_trait]
    impl AudioSink for RecordingSink {
        async fn play(&self, clip: AudioClip) -> Result<(), CoreError> {
            self.played.lock().push(clip);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSynth {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LocalSynthesizer for RecordingSynth {
        async fn speak(&self, text: &str) -> Result<(), CoreError> {
            self.calls.lock().push(format!("speak:{text}"));
            Ok(())
        }

        fn cancel(&self) {
            self.calls.lock().push("cancel".to_string());
        }

        fn name(&self) -> &str {
            "test-synth"
        }
    }

    fn settings(endpoint: Option<String>) -> VoiceSettings {
        VoiceSettings {
            tts_endpoint: endpoint,
            asr_relay: None,
            tts_timeout_ms: 2000,
        }
    }

    #[tokio::test]
    async fn network_route_wins_when_service_responds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 16]))
            .mount(&server)
            .await;

        let sink = Arc::new(RecordingSink::default());
        let synth = Arc::new(RecordingSynth::default());
        let speaker = Speaker::new(
            &settings(Some(server.uri())),
            Some(sink.clone()),
            Some(synth.clone()),
        );

        let route = speaker.speak("match prep").await;
        assert_eq!(route, SpeechRoute::Network);
        assert_eq!(sink.played.lock().len(), 1);
        assert!(synth.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn network_failure_falls_back_to_local_with_cancel_first() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let sink = Arc::new(RecordingSink::default());
        let synth = Arc::new(RecordingSynth::default());
        let speaker = Speaker::new(
            &settings(Some(server.uri())),
            Some(sink.clone()),
            Some(synth.clone()),
        );

        let route = speaker.speak("fallback please").await;
        assert_eq!(route, SpeechRoute::Local);
        assert!(sink.played.lock().is_empty());
        assert_eq!(
            *synth.calls.lock(),
            vec!["cancel", "speak:fallback please"]
        );
    }

    #[tokio::test]
    async fn no_endpoint_goes_straight_to_local() {
        let synth = Arc::new(RecordingSynth::default());
        let speaker = Speaker::new(&settings(None), None, Some(synth.clone()));

        assert_eq!(speaker.speak("hello").await, SpeechRoute::Local);
        assert_eq!(*synth.calls.lock(), vec!["cancel", "speak:hello"]);
    }

    #[tokio::test]
    async fn no_capability_is_a_silent_no_op() {
        let speaker = Speaker::new(&settings(None), None, None);
        assert!(!speaker.has_backend());
        assert_eq!(speaker.speak("anything").await, SpeechRoute::Silent);
    }
}
