//! Capture source fed by WebSocket audio messages
//!
//! The browser owns the microphone; this server-side source is the producer
//! end of the capture abstraction, pushing frames decoded from inbound
//! socket messages into the listener's bounded channel.

use async_trait::async_trait;
use coach_agent_core::{AudioFrame, AudioSource, CoreError, FrameReceiver};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Frames buffered between the socket loop and the relay-send loop
const CAPTURE_BUFFER: usize = 64;

/// Audio source bridging inbound socket frames to the listener
#[derive(Default)]
pub struct ChannelSource {
    tx: Mutex<Option<mpsc::Sender<AudioFrame>>>,
}

impl ChannelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one decoded frame into the active capture, if any
    ///
    /// Frames arriving while no capture is active are dropped, mirroring a
    /// microphone that is not currently open.
    pub async fn push(&self, frame: AudioFrame) {
        let tx = self.tx.lock().clone();
        if let Some(tx) = tx {
            if tx.send(frame).await.is_err() {
                // Listener released the capture; stop forwarding.
                self.tx.lock().take();
            }
        }
    }
}

#[async_trait]
impl AudioSource for ChannelSource {
    async fn acquire(&self) -> Result<FrameReceiver, CoreError> {
        let (tx, rx) = mpsc::channel(CAPTURE_BUFFER);
        *self.tx.lock() = Some(tx);
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_agent_core::SampleRate;

    #[tokio::test]
    async fn frames_flow_after_acquire() {
        let source = ChannelSource::new();
        let mut rx = source.acquire().await.unwrap();

        source
            .push(AudioFrame::new(vec![0.1; 160], SampleRate::Hz16000, 0))
            .await;
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.samples.len(), 160);
    }

    #[tokio::test]
    async fn frames_without_capture_are_dropped() {
        let source = ChannelSource::new();
        // No acquire; push must not hang or panic.
        source
            .push(AudioFrame::new(vec![0.1; 16], SampleRate::Hz16000, 0))
            .await;
    }

    #[tokio::test]
    async fn dropped_receiver_detaches_the_capture() {
        let source = ChannelSource::new();
        let rx = source.acquire().await.unwrap();
        drop(rx);

        source
            .push(AudioFrame::new(vec![0.1; 16], SampleRate::Hz16000, 0))
            .await;
        assert!(source.tx.lock().is_none());
    }
}
