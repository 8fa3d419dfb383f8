//! Performance agent
//!
//! Rolling averages over all available telemetry samples, formatted as a
//! one-line summary.

use coach_agent_core::{AthleteContext, PerformanceFacts};

use super::mean2;

/// Compute averages and the summary insight
pub fn run(athlete: &AthleteContext) -> (String, PerformanceFacts) {
    let facts = PerformanceFacts {
        speed_avg: mean2(athlete.metrics.iter().map(|m| m.speed_kmh)),
        accel_avg: mean2(athlete.metrics.iter().map(|m| m.accel)),
        xg_avg: mean2(athlete.metrics.iter().map(|m| m.xg)),
        pass_pct: mean2(athlete.metrics.iter().map(|m| m.pass_pct)),
    };

    let insight = format!(
        "{} — speed {} km/h, accel {} m/s², xG {}, pass {}%.",
        athlete.name, facts.speed_avg, facts.accel_avg, facts.xg_avg, facts.pass_pct
    );

    (insight, facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use coach_agent_core::MetricSample;

    fn sample(speed: f64, accel: f64, xg: f64, pass: f64) -> MetricSample {
        MetricSample {
            ts: Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap(),
            speed_kmh: speed,
            accel,
            heart_rate: 150,
            xg,
            shots: 4,
            pass_pct: pass,
        }
    }

    fn athlete(metrics: Vec<MetricSample>) -> AthleteContext {
        AthleteContext {
            id: "p1".into(),
            name: "Ava Patel".into(),
            sport: "soccer".into(),
            position: "Forward".into(),
            team: "Blue Tigers".into(),
            metrics,
        }
    }

    #[test]
    fn averages_over_all_samples() {
        let athlete = athlete(vec![
            sample(28.1, 3.1, 0.7, 78.0),
            sample(29.4, 3.4, 0.6, 82.0),
            sample(30.2, 3.6, 0.8, 80.0),
        ]);

        let (insight, facts) = run(&athlete);
        assert_eq!(facts.speed_avg, 29.23);
        assert_eq!(facts.accel_avg, 3.37);
        assert_eq!(facts.xg_avg, 0.7);
        assert_eq!(facts.pass_pct, 80.0);
        assert_eq!(
            insight,
            "Ava Patel — speed 29.23 km/h, accel 3.37 m/s², xG 0.7, pass 80%."
        );
    }

    #[test]
    fn empty_telemetry_yields_zero_averages() {
        let (_, facts) = run(&athlete(vec![]));
        assert_eq!(facts.speed_avg, 0.0);
        assert_eq!(facts.pass_pct, 0.0);
    }
}
