//! Topic classification
//!
//! Keyword-table routing: a topic matches when any of its keywords occurs as
//! a substring of the lower-cased question. Total over every input; an
//! unmatched question defaults to the performance topic.

use coach_agent_core::TopicTag;

/// Keywords per topic. A question matching keywords from several topics
/// routes to the union of those topics' agents; there is no ranking.
const KEYWORDS: [(TopicTag, &[&str]); 4] = [
    (
        TopicTag::Performance,
        &[
            "speed", "xg", "form", "fitness", "stats", "performance", "passing", "accel", "shot",
        ],
    ),
    (
        TopicTag::Tactics,
        &[
            "tactic", "formation", "press", "counter", "defend", "attack", "build-up",
        ],
    ),
    (
        TopicTag::Training,
        &[
            "drill", "training", "practice", "plan", "session", "warmup", "cooldown", "recovery",
        ],
    ),
    (
        TopicTag::Mental,
        &[
            "mindset",
            "confidence",
            "focus",
            "visualization",
            "breath",
            "anxiety",
            "pep",
            "motivation",
        ],
    ),
];

/// Classify a question into a non-empty set of topic tags
///
/// The returned tags are in declaration order (performance, tactics,
/// training, mental). No match defaults to `[Performance]`.
pub fn classify(text: &str) -> Vec<TopicTag> {
    let lowered = text.to_lowercase();

    let matched: Vec<TopicTag> = KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(tag, _)| *tag)
        .collect();

    if matched.is_empty() {
        vec![TopicTag::Performance]
    } else {
        matched
    }
}
