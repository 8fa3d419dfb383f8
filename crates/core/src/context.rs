//! External context: goals and diary
//!
//! Owned and edited by collaborators outside this core; consumed as
//! read-only synthesis inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A training goal with its category label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    /// Free-form category tag (e.g. "speed", "passing")
    pub category: String,
    pub text: String,
    pub created: NaiveDate,
}

/// Diary entry activity tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Training,
    Eating,
    Sleep,
    Recovery,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Training => "training",
            ActivityType::Eating => "eating",
            ActivityType::Sleep => "sleep",
            ActivityType::Recovery => "recovery",
        }
    }
}

/// One dated diary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    pub date: NaiveDate,
    pub activity: ActivityType,
    pub text: String,
}

/// Read-only bundle of goals and diary supplied to synthesis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalContext {
    pub goals: Vec<Goal>,
    pub diary: Vec<DiaryEntry>,
}

impl ExternalContext {
    /// The most recent diary entries, newest last, at most `n`
    pub fn recent_diary(&self, n: usize) -> &[DiaryEntry] {
        let start = self.diary.len().saturating_sub(n);
        &self.diary[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> DiaryEntry {
        DiaryEntry {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
            activity: ActivityType::Training,
            text: "5v5 small-sided".into(),
        }
    }

    #[test]
    fn recent_diary_takes_tail() {
        let ctx = ExternalContext {
            goals: vec![],
            diary: vec![entry("d1"), entry("d2"), entry("d3"), entry("d4")],
        };
        let recent = ctx.recent_diary(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, "d2");
        assert_eq!(recent[2].id, "d4");
    }

    #[test]
    fn recent_diary_handles_short_lists() {
        let ctx = ExternalContext {
            goals: vec![],
            diary: vec![entry("d1")],
        };
        assert_eq!(ctx.recent_diary(3).len(), 1);
        assert!(ExternalContext::default().recent_diary(3).is_empty());
    }
}
