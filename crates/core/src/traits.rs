//! Speech backend traits
//!
//! The voice pipelines are ordered chains of strategies behind these traits:
//! the speaker tries network synthesis then a local synthesizer; the listener
//! tries the network relay then a local recognizer. Local facilities are
//! capability-gated - an absent trait object degrades the pipeline rather
//! than erroring.

use crate::audio::{AudioClip, AudioFrame};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Channel of captured audio frames, bounded so a slow consumer applies
/// backpressure to the capture callback rather than buffering unboundedly.
pub type FrameReceiver = mpsc::Receiver<AudioFrame>;

/// Plays encoded audio clips
///
/// # Example
///
/// ```ignore
/// let sink: Arc<dyn AudioSink> = Arc::new(DeviceSink::default_output()?);
/// sink.play(clip).await?;
/// ```
#[async_trait]
pub trait AudioSink: Send + Sync + 'static {
    /// Play a clip to completion
    async fn play(&self, clip: AudioClip) -> Result<()>;
}

/// Local speech synthesis facility
///
/// At most one local utterance is audible at a time; the speaker pipeline
/// cancels the current utterance before starting a new one.
#[async_trait]
pub trait LocalSynthesizer: Send + Sync + 'static {
    /// Synthesize and play `text`
    async fn speak(&self, text: &str) -> Result<()>;

    /// Cancel the utterance currently playing, if any. Must be safe to call
    /// when nothing is playing.
    fn cancel(&self);

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Audio capture source (microphone or equivalent)
///
/// Acquisition is where permission failures surface: a denied capture device
/// fails `acquire`, which the listener treats as backend-initialization
/// failure and falls through to the next strategy.
#[async_trait]
pub trait AudioSource: Send + Sync + 'static {
    /// Acquire the device and start capture; frames flow on the returned
    /// channel until the receiver is dropped or capture ends.
    async fn acquire(&self) -> Result<FrameReceiver>;
}

/// Local one-shot speech recognizer
#[async_trait]
pub trait LocalRecognizer: Send + Sync + 'static {
    /// Consume frames until a single utterance is recognized; returns `None`
    /// when capture ends without a recognizable utterance.
    async fn recognize(&self, frames: FrameReceiver) -> Result<Option<String>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
