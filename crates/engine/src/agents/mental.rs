//! Mental agent
//!
//! Fixed visualization/breathing script parameterized only by athlete name.

use coach_agent_core::{AthleteContext, MentalFacts};

/// Produce the pep-talk script
pub fn run(athlete: &AthleteContext) -> (String, MentalFacts) {
    let facts = MentalFacts {
        script: format!(
            "Pep talk for {}: Breathe 4-4-8. Visualize first touch forward. Trust your pace.",
            athlete.name
        ),
    };

    ("Mental routine prepared.".to_string(), facts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_parameterized_by_name() {
        let athlete = AthleteContext {
            id: "p2".into(),
            name: "Diego Santos".into(),
            sport: "soccer".into(),
            position: "Midfielder".into(),
            team: "Blue Tigers".into(),
            metrics: vec![],
        };

        let (insight, facts) = run(&athlete);
        assert_eq!(insight, "Mental routine prepared.");
        assert!(facts.script.starts_with("Pep talk for Diego Santos:"));
        assert!(facts.script.contains("Breathe 4-4-8"));
    }
}
