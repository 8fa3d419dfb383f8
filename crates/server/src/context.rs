//! Seeded context providers
//!
//! The collaborator boundary for everything the synthesis engine consumes
//! read-only: athlete roster with telemetry, readiness snapshots, goals,
//! and diary. Editing these lists is a UI concern outside this core; the
//! providers serve a demo roster seeded at startup.

use chrono::{NaiveDate, TimeZone, Utc};
use coach_agent_core::{
    ActivityType, AthleteContext, DiaryEntry, ExternalContext, FatigueLevel, Goal, MetricSample,
    ReadinessSnapshot,
};
use std::collections::HashMap;

/// Read-only providers for athlete and external context
pub struct ContextProviders {
    athletes: Vec<AthleteContext>,
    readiness: HashMap<String, ReadinessSnapshot>,
    external: ExternalContext,
}

impl ContextProviders {
    /// Providers with the demo roster
    pub fn seeded() -> Self {
        let athletes = vec![
            AthleteContext {
                id: "p1".into(),
                name: "Ava Patel".into(),
                sport: "soccer".into(),
                position: "Forward".into(),
                team: "Blue Tigers".into(),
                metrics: vec![
                    sample("2025-08-01", 28.1, 3.1, 152, 0.7, 5, 78.0),
                    sample("2025-08-02", 29.4, 3.4, 156, 0.6, 3, 82.0),
                    sample("2025-08-03", 30.2, 3.6, 158, 0.8, 6, 80.0),
                ],
            },
            AthleteContext {
                id: "p2".into(),
                name: "Diego Santos".into(),
                sport: "soccer".into(),
                position: "Midfielder".into(),
                team: "Blue Tigers".into(),
                metrics: vec![
                    sample("2025-08-01", 26.0, 2.9, 148, 0.2, 1, 89.0),
                    sample("2025-08-02", 27.5, 3.0, 151, 0.3, 2, 90.0),
                    sample("2025-08-03", 27.1, 2.8, 147, 0.25, 2, 88.0),
                ],
            },
        ];

        let mut readiness = HashMap::new();
        readiness.insert(
            "p1".to_string(),
            ReadinessSnapshot {
                sleep_score: 78,
                hr_rest: 56,
                hrv: 78,
                fatigue: FatigueLevel::Moderate,
            },
        );
        readiness.insert(
            "p2".to_string(),
            ReadinessSnapshot {
                sleep_score: 88,
                hr_rest: 52,
                hrv: 92,
                fatigue: FatigueLevel::Low,
            },
        );

        let external = ExternalContext {
            goals: vec![
                goal("g1", "speed", "Hit 31 km/h top speed", "2025-07-30"),
                goal("g2", "passing", "Reach 88% pass accuracy", "2025-07-31"),
                goal("g3", "endurance", "Complete 10km run under 45 minutes", "2025-08-01"),
                goal("g4", "strength", "Bench press 100kg for 5 reps", "2025-08-02"),
            ],
            diary: vec![
                diary("d1", "2025-08-02", ActivityType::Training, "5v5 small-sided, good pop"),
                diary("d2", "2025-08-03", ActivityType::Eating, "Carb load pre-session"),
                diary("d3", "2025-08-04", ActivityType::Recovery, "Foam roll + 20min mobility"),
            ],
        };

        Self {
            athletes,
            readiness,
            external,
        }
    }

    /// Full roster
    pub fn athletes(&self) -> &[AthleteContext] {
        &self.athletes
    }

    /// Athlete by id
    pub fn athlete(&self, id: &str) -> Option<&AthleteContext> {
        self.athletes.iter().find(|a| a.id == id)
    }

    /// The demo user's athlete (first in the roster)
    pub fn default_athlete(&self) -> &AthleteContext {
        &self.athletes[0]
    }

    /// Readiness snapshot for an athlete, with documented defaults when the
    /// athlete has none recorded
    pub fn readiness_for(&self, athlete_id: &str) -> ReadinessSnapshot {
        self.readiness
            .get(athlete_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Goals and diary
    pub fn external(&self) -> &ExternalContext {
        &self.external
    }
}

fn sample(
    date: &str,
    speed_kmh: f64,
    accel: f64,
    heart_rate: u32,
    xg: f64,
    shots: u32,
    pass_pct: f64,
) -> MetricSample {
    let day: NaiveDate = date.parse().expect("seed date");
    MetricSample {
        ts: Utc
            .from_utc_datetime(&day.and_hms_opt(10, 0, 0).expect("seed time")),
        speed_kmh,
        accel,
        heart_rate,
        xg,
        shots,
        pass_pct,
    }
}

fn goal(id: &str, category: &str, text: &str, created: &str) -> Goal {
    Goal {
        id: id.into(),
        category: category.into(),
        text: text.into(),
        created: created.parse().expect("seed date"),
    }
}

fn diary(id: &str, date: &str, activity: ActivityType, text: &str) -> DiaryEntry {
    DiaryEntry {
        id: id.into(),
        date: date.parse().expect("seed date"),
        activity,
        text: text.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_seeded() {
        let context = ContextProviders::seeded();
        assert_eq!(context.athletes().len(), 2);
        assert_eq!(context.default_athlete().name, "Ava Patel");
        assert!(context.default_athlete().is_forward());
        assert_eq!(context.athlete("p2").unwrap().position, "Midfielder");
        assert!(context.athlete("p9").is_none());
    }

    #[test]
    fn readiness_falls_back_to_defaults() {
        let context = ContextProviders::seeded();
        assert_eq!(context.readiness_for("p1").fatigue, FatigueLevel::Moderate);

        let fallback = context.readiness_for("unknown");
        assert_eq!(fallback.sleep_score, 75);
        assert_eq!(fallback.fatigue, FatigueLevel::Low);
    }

    #[test]
    fn external_context_is_populated() {
        let context = ContextProviders::seeded();
        assert_eq!(context.external().goals.len(), 4);
        assert_eq!(context.external().diary.len(), 3);
        assert_eq!(context.external().goals[0].category, "speed");
    }
}
