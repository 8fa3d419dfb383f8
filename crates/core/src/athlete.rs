//! Athlete telemetry and readiness data model
//!
//! Supplied read-only per query by the context providers; the synthesis
//! engine never mutates these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped performance sample from match or training telemetry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    /// Capture time
    pub ts: DateTime<Utc>,
    /// Top speed over the sample window (km/h)
    pub speed_kmh: f64,
    /// Peak acceleration (m/s²)
    pub accel: f64,
    /// Average heart rate (bpm)
    pub heart_rate: u32,
    /// Expected-goals value
    pub xg: f64,
    /// Shot count
    pub shots: u32,
    /// Pass completion percentage
    pub pass_pct: f64,
}

/// Categorical fatigue level from the readiness snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FatigueLevel {
    #[default]
    Low,
    Moderate,
    High,
}

impl FatigueLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FatigueLevel::Low => "low",
            FatigueLevel::Moderate => "moderate",
            FatigueLevel::High => "high",
        }
    }
}

/// Daily readiness snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    /// Sleep score (0-100)
    pub sleep_score: u32,
    /// Resting heart rate (bpm)
    pub hr_rest: u32,
    /// Heart-rate variability (ms)
    pub hrv: u32,
    /// Categorical fatigue level
    pub fatigue: FatigueLevel,
}

impl Default for ReadinessSnapshot {
    fn default() -> Self {
        Self {
            sleep_score: 75,
            hr_rest: 58,
            hrv: 70,
            fatigue: FatigueLevel::Low,
        }
    }
}

impl ReadinessSnapshot {
    /// Human recommendation derived from the fatigue level
    pub fn recommendation(&self) -> &'static str {
        match self.fatigue {
            FatigueLevel::Low => "You're well recovered. Ready for high-intensity training.",
            FatigueLevel::Moderate => {
                "You're moderately recovered. A steady training session is fine, \
                 but avoid max-intensity efforts."
            }
            FatigueLevel::High => "You need recovery. Focus on light activity or rest today.",
        }
    }
}

/// Identity and telemetry for one athlete, immutable per query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteContext {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Sport (e.g. "soccer")
    pub sport: String,
    /// Position on the pitch (e.g. "Forward")
    pub position: String,
    /// Team name
    pub team: String,
    /// Ordered performance samples, oldest first
    pub metrics: Vec<MetricSample>,
}

impl AthleteContext {
    /// Whether the athlete plays as a forward (case-insensitive position match)
    pub fn is_forward(&self) -> bool {
        self.position.eq_ignore_ascii_case("forward")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_position_is_case_insensitive() {
        let mut athlete = AthleteContext {
            id: "p1".into(),
            name: "Ava".into(),
            sport: "soccer".into(),
            position: "FORWARD".into(),
            team: "Blue Tigers".into(),
            metrics: vec![],
        };
        assert!(athlete.is_forward());

        athlete.position = "Midfielder".into();
        assert!(!athlete.is_forward());
    }

    #[test]
    fn fatigue_serializes_lowercase() {
        let json = serde_json::to_string(&FatigueLevel::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }

    #[test]
    fn recommendation_tracks_fatigue() {
        let snapshot = ReadinessSnapshot {
            fatigue: FatigueLevel::High,
            ..Default::default()
        };
        assert!(snapshot.recommendation().contains("recovery"));
    }
}
