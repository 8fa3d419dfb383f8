//! Answer synthesis
//!
//! Dispatches the classified question over the domain agents in declaration
//! order, merges their fact contributions, and composes the final answer
//! string from persona labels, goals, recent diary entries, and the
//! accumulated insights.

use coach_agent_core::{
    AthleteContext, DiaryEntry, FactBundle, Goal, Persona, ReadinessSnapshot, TopicTag,
};
use std::sync::Arc;

use crate::agents;
use crate::classifier::classify;
use crate::weather::{FixedWeather, WeatherNoteSelector};

/// Placeholder rendered when goals or diary are empty
const EMPTY_CONTEXT: &str = "—";

/// How many diary entries feed the answer preamble
const DIARY_CONTEXT_ENTRIES: usize = 3;

/// Read-only inputs for one query
#[derive(Clone, Copy)]
pub struct QueryInput<'a> {
    pub question: &'a str,
    pub athlete: &'a AthleteContext,
    pub readiness: &'a ReadinessSnapshot,
    pub goals: &'a [Goal],
    pub diary: &'a [DiaryEntry],
    pub personas: &'a [Persona],
}

/// Result of dispatching one query over the agents
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Topics the question matched (after defaulting)
    pub topics: Vec<TopicTag>,
    /// Insight strings in invocation order
    pub insights: Vec<String>,
    /// Merged fact contributions
    pub facts: FactBundle,
}

/// The synthesis engine
///
/// Deterministic and side-effect-free given its inputs and the injected
/// weather-note selector.
pub struct SynthesisEngine {
    weather: Arc<dyn WeatherNoteSelector>,
}

impl Default for SynthesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthesisEngine {
    /// Engine with the deterministic weather selector
    pub fn new() -> Self {
        Self {
            weather: Arc::new(FixedWeather::default()),
        }
    }

    /// Engine with a custom weather-note selector
    pub fn with_weather(weather: Arc<dyn WeatherNoteSelector>) -> Self {
        Self { weather }
    }

    /// Classify the question and invoke each matched agent in fixed order.
    ///
    /// Invocation order is performance → tactics → training → mental: the
    /// training agent reads the performance averages merged earlier in the
    /// same call, never a previous call's.
    pub fn run_agents(&self, question: &str, athlete: &AthleteContext, readiness: &ReadinessSnapshot) -> AgentRun {
        let topics = classify(question);
        let mut insights = Vec::new();
        let mut facts = FactBundle::default();

        for tag in TopicTag::ALL {
            if !topics.contains(&tag) {
                continue;
            }
            match tag {
                TopicTag::Performance => {
                    let (insight, contribution) = agents::performance::run(athlete);
                    insights.push(insight);
                    facts.performance = Some(contribution);
                }
                TopicTag::Tactics => {
                    let (insight, contribution) = agents::tactics::run(athlete);
                    insights.push(insight);
                    facts.tactics = Some(contribution);
                }
                TopicTag::Training => {
                    let (insight, contribution) = agents::training::run(
                        facts.performance.as_ref(),
                        Some(readiness),
                        self.weather.as_ref(),
                    );
                    insights.push(insight);
                    facts.training = Some(contribution);
                }
                TopicTag::Mental => {
                    let (insight, contribution) = agents::mental::run(athlete);
                    insights.push(insight);
                    facts.mental = Some(contribution);
                }
            }
        }

        AgentRun {
            topics,
            insights,
            facts,
        }
    }

    /// Compose the full answer string for one query
    pub fn answer(&self, input: QueryInput<'_>) -> String {
        let run = self.run_agents(input.question, input.athlete, input.readiness);

        tracing::debug!(
            topics = ?run.topics,
            agents = run.insights.len(),
            "Synthesized answer"
        );

        format!(
            "{} — Using context from goals & diary: {} | {}. {}",
            persona_labels(input.personas),
            goals_context(input.goals),
            diary_context(input.diary),
            run.insights.join(" | ")
        )
    }
}

fn persona_labels(personas: &[Persona]) -> String {
    if personas.is_empty() {
        return Persona::default().label().to_string();
    }
    personas
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn goals_context(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }
    goals
        .iter()
        .map(|g| format!("[goal:{}] {}", g.category, g.text))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn diary_context(diary: &[DiaryEntry]) -> String {
    if diary.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }
    let start = diary.len().saturating_sub(DIARY_CONTEXT_ENTRIES);
    diary[start..]
        .iter()
        .map(|d| format!("[{}:{}] {}", d.date, d.activity.as_str(), d.text))
        .collect::<Vec<_>>()
        .join(" | ")
}
