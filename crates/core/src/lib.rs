//! Core traits and types for the coach agent
//!
//! This crate provides foundational types used across all other crates:
//! - Athlete, readiness, and external-context data model
//! - Chat message and persona types
//! - Topic tags and agent fact bundles
//! - Audio frame types and PCM16 conversion
//! - Transcript events
//! - Speech backend traits (audio sink, local synthesis/recognition, capture)
//! - Error types

pub mod athlete;
pub mod audio;
pub mod chat;
pub mod context;
pub mod error;
pub mod facts;
pub mod traits;
pub mod transcript;

pub use athlete::{AthleteContext, FatigueLevel, MetricSample, ReadinessSnapshot};
pub use audio::{AudioClip, AudioFrame, SampleRate};
pub use chat::{ChatMessage, MessageRole, Persona};
pub use context::{ActivityType, DiaryEntry, ExternalContext, Goal};
pub use error::{CoreError, Result};
pub use facts::{
    FactBundle, MentalFacts, PerformanceFacts, TacticsFacts, TopicTag, TrainingFacts,
};
pub use traits::{AudioSink, AudioSource, FrameReceiver, LocalRecognizer, LocalSynthesizer};
pub use transcript::TranscriptEvent;
