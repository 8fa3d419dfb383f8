//! Weather-conditioned training notes
//!
//! The training agent attaches one of two fixed condition templates to its
//! drill list. Which template applies is an external concern (a weather
//! feed in a full deployment), so the choice is injected as a selector
//! trait: synthesis stays deterministic under `FixedWeather`, while the
//! server wires `SampledWeather` to vary notes across queries.

use rand::Rng;

/// The two fixed training-note conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherNote {
    Mild,
    Hot,
}

impl WeatherNote {
    /// Training note template for this condition
    pub fn template(&self) -> &'static str {
        match self {
            WeatherNote::Mild => "Mild (75°F). Intervals + extended warmup.",
            WeatherNote::Hot => "Hot (83°F). Morning tempo + hydrate.",
        }
    }
}

/// Selects the weather note for one training-agent invocation
pub trait WeatherNoteSelector: Send + Sync {
    fn select(&self) -> WeatherNote;
}

/// Always returns the same condition; the engine default and the test
/// selector.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub WeatherNote);

impl Default for FixedWeather {
    fn default() -> Self {
        Self(WeatherNote::Mild)
    }
}

impl WeatherNoteSelector for FixedWeather {
    fn select(&self) -> WeatherNote {
        self.0
    }
}

/// Samples a condition uniformly per invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledWeather;

impl WeatherNoteSelector for SampledWeather {
    fn select(&self) -> WeatherNote {
        if rand::thread_rng().gen_bool(0.5) {
            WeatherNote::Mild
        } else {
            WeatherNote::Hot
        }
    }
}
