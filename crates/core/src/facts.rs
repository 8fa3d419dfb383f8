//! Topic tags and agent fact contributions

use serde::{Deserialize, Serialize};

/// Topic of a coaching question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicTag {
    Performance,
    Tactics,
    Training,
    Mental,
}

impl TopicTag {
    /// All topics in agent invocation order. Training reads facts placed by
    /// performance in the same query, so this order is a contract, not a
    /// listing convenience.
    pub const ALL: [TopicTag; 4] = [
        TopicTag::Performance,
        TopicTag::Tactics,
        TopicTag::Training,
        TopicTag::Mental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicTag::Performance => "performance",
            TopicTag::Tactics => "tactics",
            TopicTag::Training => "training",
            TopicTag::Mental => "mental",
        }
    }
}

/// Rolling averages computed by the performance agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceFacts {
    pub speed_avg: f64,
    pub accel_avg: f64,
    pub xg_avg: f64,
    pub pass_pct: f64,
}

/// Formation and note derived by the tactics agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticsFacts {
    pub formation: String,
    pub note: String,
}

/// Drill list and weather note from the training agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingFacts {
    pub drills: Vec<String>,
    pub weather: String,
}

/// Visualization script from the mental agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalFacts {
    pub script: String,
}

/// Merged structured output of all agents invoked for one query
///
/// One slot per domain; an agent's contribution fills exactly its own slot,
/// so contributions cannot collide. Filled slots are exactly the set of
/// agents invoked for the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactBundle {
    pub performance: Option<PerformanceFacts>,
    pub tactics: Option<TacticsFacts>,
    pub training: Option<TrainingFacts>,
    pub mental: Option<MentalFacts>,
}

impl FactBundle {
    /// Domains that contributed to this bundle, in invocation order
    pub fn domains(&self) -> Vec<TopicTag> {
        let mut tags = Vec::new();
        if self.performance.is_some() {
            tags.push(TopicTag::Performance);
        }
        if self.tactics.is_some() {
            tags.push(TopicTag::Tactics);
        }
        if self.training.is_some() {
            tags.push(TopicTag::Training);
        }
        if self.mental.is_some() {
            tags.push(TopicTag::Mental);
        }
        tags
    }
}
