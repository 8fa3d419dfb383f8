//! Listener pipeline: speech input with fallback
//!
//! Backend precedence: the streaming network relay is attempted first when
//! configured; the local one-shot recognizer only runs when the network
//! variant is unavailable or fails to initialize. A socket failure after a
//! successful connection tears down to idle - it does not retry into the
//! local variant.
//!
//! Capture frames flow over a bounded channel from the audio source into
//! the socket-send loop, and every terminal path releases the capture
//! exactly once by dropping that channel's receiver.

use coach_agent_core::{AudioSource, LocalRecognizer, TranscriptEvent};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::relay::parse_transcript;
use crate::VoiceError;

/// Which transcription backend is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerBackend {
    /// Streaming relay over WebSocket
    Network,
    /// Local one-shot recognizer
    Local,
}

/// Listener lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerState {
    /// No capture session
    #[default]
    Idle,
    /// Start requested, backend initializing
    Connecting,
    /// Capturing and transcribing
    Active(ListenerBackend),
}

/// Speech-input pipeline
pub struct Listener {
    relay_url: Option<String>,
    source: Arc<dyn AudioSource>,
    local: Option<Arc<dyn LocalRecognizer>>,
    state: watch::Sender<ListenerState>,
    stop: Mutex<Option<watch::Sender<bool>>>,
}

impl Listener {
    /// Create a listener over the given capture source
    ///
    /// `relay_url` is the optional streaming relay (absence routes to the
    /// local recognizer); `local` is the optional local capability.
    pub fn new(
        relay_url: Option<String>,
        source: Arc<dyn AudioSource>,
        local: Option<Arc<dyn LocalRecognizer>>,
    ) -> Self {
        let (state, _) = watch::channel(ListenerState::default());
        Self {
            relay_url,
            source,
            local,
            state,
            stop: Mutex::new(None),
        }
    }

    /// Current state
    pub fn state(&self) -> ListenerState {
        *self.state.borrow()
    }

    /// Whether a capture session is active
    pub fn listening(&self) -> bool {
        matches!(self.state(), ListenerState::Active(_))
    }

    /// Backend of the active session, if any
    pub fn backend(&self) -> Option<ListenerBackend> {
        match self.state() {
            ListenerState::Active(backend) => Some(backend),
            _ => None,
        }
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<ListenerState> {
        self.state.subscribe()
    }

    /// Start a capture session; transcripts flow to `transcripts`
    ///
    /// Interim and final events may arrive many times per session. When no
    /// backend can initialize (relay unreachable, capture denied, no local
    /// capability) the pipeline returns to idle without emitting anything -
    /// silent degradation by design.
    pub async fn listen(&self, transcripts: mpsc::Sender<TranscriptEvent>) {
        if !matches!(self.state(), ListenerState::Idle) {
            tracing::warn!("Listener already active; ignoring start request");
            return;
        }
        self.state.send_replace(ListenerState::Connecting);

        let (stop_tx, stop_rx) = watch::channel(false);
        *self.stop.lock() = Some(stop_tx);

        if let Some(url) = self.relay_url.clone() {
            match self
                .start_network(&url, transcripts.clone(), stop_rx.clone())
                .await
            {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(error = %e, "Network transcription unavailable; trying local recognizer");
                }
            }
        }

        if let Some(recognizer) = self.local.clone() {
            match self.start_local(recognizer, transcripts, stop_rx).await {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(error = %e, "Local recognizer unavailable");
                }
            }
        }

        *self.stop.lock() = None;
        self.state.send_replace(ListenerState::Idle);
        tracing::debug!("No transcription backend available; staying idle");
    }

    /// Stop the active capture session
    ///
    /// Idempotent: with no active session this is a no-op. Teardown is
    /// cooperative - the session task closes the socket or halts the
    /// recognizer, releases capture, and settles the state back to idle.
    pub fn stop(&self) {
        if let Some(stop) = self.stop.lock().take() {
            let _ = stop.send(true);
        }
    }

    async fn start_network(
        &self,
        url: &str,
        transcripts: mpsc::Sender<TranscriptEvent>,
        mut stop_rx: watch::Receiver<bool>,
    ) -> Result<(), VoiceError> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|e| VoiceError::Connect(e.to_string()))?;

        // Capture acquisition failure counts as backend-initialization
        // failure, so the caller can still fall through to the local variant.
        let mut frames = self
            .source
            .acquire()
            .await
            .map_err(|e| VoiceError::Capture(e.to_string()))?;

        self.state.send_replace(ListenerState::Active(ListenerBackend::Network));
        tracing::info!(relay = %url, "Streaming transcription started");

        let state = self.state.clone();
        tokio::spawn(async move {
            let (mut sink, mut stream) = socket.split();

            loop {
                tokio::select! {
                    frame = frames.recv() => match frame {
                        Some(frame) => {
                            if sink.send(Message::Binary(frame.to_pcm16())).await.is_err() {
                                break;
                            }
                        }
                        // Capture ended upstream.
                        None => break,
                    },
                    message = stream.next() => match message {
                        Some(Ok(Message::Text(payload))) => {
                            if let Some(event) = parse_transcript(&payload) {
                                if transcripts.send(event).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    },
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            let _ = sink.close().await;
                            break;
                        }
                    }
                }
            }

            // Single teardown point: dropping the receiver releases capture.
            drop(frames);
            state.send_replace(ListenerState::Idle);
            tracing::debug!("Streaming transcription ended");
        });

        Ok(())
    }

    async fn start_local(
        &self,
        recognizer: Arc<dyn LocalRecognizer>,
        transcripts: mpsc::Sender<TranscriptEvent>,
        mut stop_rx: watch::Receiver<bool>,
    ) -> Result<(), VoiceError> {
        let frames = self
            .source
            .acquire()
            .await
            .map_err(|e| VoiceError::Capture(e.to_string()))?;

        self.state.send_replace(ListenerState::Active(ListenerBackend::Local));
        tracing::info!(backend = recognizer.name(), "One-shot recognition started");

        let state = self.state.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = recognizer.recognize(frames) => match result {
                    Ok(Some(text)) => {
                        let _ = transcripts.send(TranscriptEvent::final_text(text)).await;
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "Local recognition failed"),
                },
                _ = stop_rx.changed() => {}
            }

            state.send_replace(ListenerState::Idle);
            tracing::debug!("One-shot recognition ended");
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coach_agent_core::{AudioFrame, CoreError, FrameReceiver, SampleRate};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    /// Source yielding a fixed number of small frames, then ending capture
    struct ScriptedSource {
        frames: usize,
    }

    #[async_trait]
    impl AudioSource for ScriptedSource {
        async fn acquire(&self) -> Result<FrameReceiver, CoreError> {
            let (tx, rx) = mpsc::channel(8);
            let frames = self.frames;
            tokio::spawn(async move {
                for sequence in 0..frames as u64 {
                    let frame = AudioFrame::new(vec![0.25; 160], SampleRate::Hz16000, sequence);
                    if tx.send(frame).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
                // Keep capture open until the listener drops the receiver.
                tx.closed().await;
            });
            Ok(rx)
        }
    }

    /// Source whose device is denied
    struct DeniedSource;

    #[async_trait]
    impl AudioSource for DeniedSource {
        async fn acquire(&self) -> Result<FrameReceiver, CoreError> {
            Err(CoreError::Capability("microphone permission denied".into()))
        }
    }

    /// Recognizer returning one fixed transcript
    struct OneShotRecognizer;

    #[async_trait]
    impl LocalRecognizer for OneShotRecognizer {
        async fn recognize(&self, mut frames: FrameReceiver) -> Result<Option<String>, CoreError> {
            // Consume one frame, then report the utterance.
            let _ = frames.recv().await;
            Ok(Some("what drills today".to_string()))
        }

        fn name(&self) -> &str {
            "one-shot"
        }
    }

    async fn wait_for_idle(listener: &Listener) {
        let mut states = listener.subscribe();
        tokio::time::timeout(Duration::from_secs(2), async {
            while !matches!(*states.borrow_and_update(), ListenerState::Idle) {
                states.changed().await.unwrap();
            }
        })
        .await
        .expect("listener did not settle to idle");
    }

    /// Relay double: accepts one socket, counts binary frames, sends a
    /// transcript message after the first frame, then closes.
    async fn spawn_relay(messages: Vec<String>) -> String {
        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = tcp.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = tcp.accept().await.unwrap();
            let mut socket = accept_async(stream).await.unwrap();

            // Wait for audio before answering, like a real relay.
            let mut saw_audio = false;
            while let Some(Ok(message)) = socket.next().await {
                if let Message::Binary(bytes) = message {
                    assert_eq!(bytes.len() % 2, 0, "frames must be whole PCM16 samples");
                    if !saw_audio {
                        saw_audio = true;
                        for payload in &messages {
                            socket.send(Message::Text(payload.clone())).await.unwrap();
                        }
                        socket.close(None).await.unwrap();
                    }
                }
            }
        });
        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn network_variant_streams_pcm_and_emits_transcripts() {
        let relay = spawn_relay(vec![
            r#"{"status":"listening"}"#.to_string(),
            r#"{"text":"how is"}"#.to_string(),
            r#"{"text":"how is my form","is_final":true}"#.to_string(),
        ])
        .await;

        let listener = Listener::new(
            Some(relay),
            Arc::new(ScriptedSource { frames: 50 }),
            None,
        );
        let (tx, mut rx) = mpsc::channel(8);
        listener.listen(tx).await;

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.text, "how is");
        assert!(!first.is_final);

        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(second.is_final);

        // Relay closed the socket: resources released, state back to idle.
        wait_for_idle(&listener).await;
        assert!(!listener.listening());
    }

    #[tokio::test]
    async fn unreachable_relay_falls_back_to_local() {
        let listener = Listener::new(
            Some("ws://127.0.0.1:9".to_string()),
            Arc::new(ScriptedSource { frames: 3 }),
            Some(Arc::new(OneShotRecognizer)),
        );
        let (tx, mut rx) = mpsc::channel(8);
        listener.listen(tx).await;

        // A transcript can only have come from the local one-shot variant.
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.text, "what drills today");
        assert!(event.is_final);

        // One-shot variant stops itself after the single transcript.
        wait_for_idle(&listener).await;
    }

    #[tokio::test]
    async fn no_relay_goes_straight_to_local() {
        let listener = Listener::new(
            None,
            Arc::new(ScriptedSource { frames: 3 }),
            Some(Arc::new(OneShotRecognizer)),
        );
        let (tx, mut rx) = mpsc::channel(8);
        listener.listen(tx).await;
        assert!(rx.recv().await.is_some());
        wait_for_idle(&listener).await;
    }

    #[tokio::test]
    async fn denied_capture_fails_both_variants_silently() {
        let listener = Listener::new(
            Some("ws://127.0.0.1:9".to_string()),
            Arc::new(DeniedSource),
            Some(Arc::new(OneShotRecognizer)),
        );
        let (tx, mut rx) = mpsc::channel(8);
        listener.listen(tx).await;

        assert_eq!(listener.state(), ListenerState::Idle);
        assert!(!listener.listening());
        // No callback ever fires.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn stop_without_session_is_a_noop_and_idempotent() {
        let listener = Listener::new(None, Arc::new(ScriptedSource { frames: 0 }), None);
        listener.stop();
        listener.stop();
        assert_eq!(listener.state(), ListenerState::Idle);
        assert!(!listener.listening());
    }

    #[tokio::test]
    async fn stop_tears_down_an_active_network_session() {
        // Relay that accepts and then stays silent.
        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = tcp.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = tcp.accept().await.unwrap();
            let mut socket = accept_async(stream).await.unwrap();
            while socket.next().await.is_some() {}
        });

        let listener = Listener::new(
            Some(format!("ws://{addr}")),
            Arc::new(ScriptedSource { frames: 100 }),
            None,
        );
        let (tx, _rx) = mpsc::channel(8);
        listener.listen(tx).await;
        assert!(listener.listening());

        listener.stop();
        listener.stop();
        wait_for_idle(&listener).await;
    }

    #[tokio::test]
    async fn second_listen_while_active_is_ignored() {
        let listener = Listener::new(
            None,
            Arc::new(ScriptedSource { frames: 100 }),
            Some(Arc::new(SlowRecognizer)),
        );
        let (tx, _rx) = mpsc::channel(8);
        listener.listen(tx.clone()).await;
        assert!(listener.listening());

        listener.listen(tx).await;
        assert_eq!(listener.backend(), Some(ListenerBackend::Local));

        listener.stop();
        wait_for_idle(&listener).await;
    }

    /// Recognizer that never finishes on its own
    struct SlowRecognizer;

    #[async_trait]
    impl LocalRecognizer for SlowRecognizer {
        async fn recognize(&self, mut frames: FrameReceiver) -> Result<Option<String>, CoreError> {
            while frames.recv().await.is_some() {}
            Ok(None)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }
}
