//! Training agent
//!
//! Threshold rules over the performance agent's current-call averages and
//! the readiness fatigue level. Rules are evaluated in a fixed order and
//! are cumulative, so the drill list order is deterministic. Missing inputs
//! take defaults that keep the corresponding rule from firing.

use coach_agent_core::{FatigueLevel, PerformanceFacts, ReadinessSnapshot, TrainingFacts};

use crate::weather::WeatherNoteSelector;

const DRILL_RESISTED_SPRINTS: &str = "Resisted sprints 6×20m (walk-back recovery)";
const DRILL_RONDO: &str = "Rondo 6v2 two-touch 4×3min";
const DRILL_FINISHING: &str = "Finishing patterns: cutback & near-post 4×6 reps";
const DRILL_REDUCED_VOLUME: &str = "Reduce volume −10% + 10min mobility";
const DRILL_MAINTENANCE: &str = "Maintain: mobility + small-sided 5v5 3×6min";

/// Derive the drill list and weather note
///
/// `perf` is the performance agent's contribution from the same query, when
/// that agent ran; `readiness` may be absent. Defaults: accel 10.0, pass
/// 100.0, xG 1.0, fatigue low — none of which trigger a rule.
pub fn run(
    perf: Option<&PerformanceFacts>,
    readiness: Option<&ReadinessSnapshot>,
    weather: &dyn WeatherNoteSelector,
) -> (String, TrainingFacts) {
    let accel = perf.map(|p| p.accel_avg).unwrap_or(10.0);
    let pass = perf.map(|p| p.pass_pct).unwrap_or(100.0);
    let xg = perf.map(|p| p.xg_avg).unwrap_or(1.0);
    let fatigue = readiness.map(|r| r.fatigue).unwrap_or(FatigueLevel::Low);

    let mut drills = Vec::new();
    if accel < 3.3 {
        drills.push(DRILL_RESISTED_SPRINTS.to_string());
    }
    if pass < 85.0 {
        drills.push(DRILL_RONDO.to_string());
    }
    if xg < 0.6 {
        drills.push(DRILL_FINISHING.to_string());
    }
    if fatigue == FatigueLevel::Moderate {
        drills.push(DRILL_REDUCED_VOLUME.to_string());
    }
    if drills.is_empty() {
        drills.push(DRILL_MAINTENANCE.to_string());
    }

    let facts = TrainingFacts {
        weather: weather.select().template().to_string(),
        drills,
    };

    (format!("Training: {}", facts.drills.join("; ")), facts)
}
