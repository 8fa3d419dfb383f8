//! Query routing and multi-agent answer synthesis
//!
//! A question flows through three deterministic stages:
//! 1. The classifier maps free text to a set of topic tags.
//! 2. Each matched domain agent contributes an insight string and a typed
//!    fact contribution, invoked in fixed order so that the training agent
//!    can read the performance agent's current-call averages.
//! 3. The synthesis engine blends the insights with goals, diary, and
//!    persona context into one answer string.
//!
//! Everything here is a pure function of its inputs plus the injected
//! weather-note selector; no I/O, no failure modes.

pub mod agents;
pub mod classifier;
pub mod synthesis;
pub mod weather;

pub use classifier::classify;
pub use synthesis::{QueryInput, SynthesisEngine};
pub use weather::{FixedWeather, SampledWeather, WeatherNote, WeatherNoteSelector};
