//! Tactics agent
//!
//! Formation and tactical note derived from the position field alone; no
//! numeric work.

use coach_agent_core::{AthleteContext, TacticsFacts};

/// Derive formation and note for the athlete's position
pub fn run(athlete: &AthleteContext) -> (String, TacticsFacts) {
    let (formation, note) = if athlete.is_forward() {
        ("4-3-3", "High press; isolate 9 in half-spaces.")
    } else {
        ("4-2-3-1", "Double pivot for buildup; protect transitions.")
    };

    let facts = TacticsFacts {
        formation: formation.to_string(),
        note: note.to_string(),
    };

    (format!("Tactics: {note}"), facts)
}
