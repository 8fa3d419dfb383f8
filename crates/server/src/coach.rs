//! Chat turn orchestration
//!
//! One user question end to end: resolve the athlete and context, synthesize
//! the answer, stream it into the session, then speak it if the session's
//! toggle is on. Voice failures never surface here - the speaker absorbs
//! them.

use coach_agent_chat::ChatSession;
use coach_agent_engine::QueryInput;
use coach_agent_voice::Speaker;
use std::sync::Arc;

use crate::state::AppState;

/// Run one chat turn against a session
///
/// `athlete_id` falls back to the demo athlete when absent or unknown.
/// Returns the finalized answer text after the reveal completes.
pub async fn run_chat_turn(
    state: &AppState,
    session: &Arc<ChatSession>,
    question: &str,
    athlete_id: Option<&str>,
    speaker: &Speaker,
) -> String {
    let athlete = athlete_id
        .and_then(|id| state.context.athlete(id))
        .unwrap_or_else(|| state.context.default_athlete());
    let readiness = state.context.readiness_for(&athlete.id);
    let personas = session.personas();
    let external = state.context.external();

    let answer = state.engine.answer(QueryInput {
        question,
        athlete,
        readiness: &readiness,
        goals: &external.goals,
        diary: &external.diary,
        personas: &personas,
    });

    state.store.deliver(session, question, &answer).await;

    if session.speaking() {
        let route = speaker.speak(&answer).await;
        tracing::debug!(session_id = %session.id, ?route, "Spoke answer");
    }

    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_agent_config::Settings;
    use coach_agent_core::MessageRole;

    fn fast_state() -> AppState {
        let mut settings = Settings::default();
        settings.chat.reveal_interval_ms = 1;
        AppState::new(settings)
    }

    #[tokio::test]
    async fn turn_appends_user_and_finalized_assistant_messages() {
        let state = fast_state();
        let session = state.store.create().unwrap();
        let speaker = Speaker::silent();

        let answer = run_chat_turn(
            &state,
            &session,
            "How is my form and what drills for this week?",
            None,
            &speaker,
        )
        .await;

        assert!(answer.starts_with("Calm mentor — Using context from goals & diary:"));
        assert!(answer.contains("Ava Patel — speed"));
        assert!(answer.contains("Training:"));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].text, answer);
    }

    #[tokio::test]
    async fn unknown_athlete_falls_back_to_demo_roster() {
        let state = fast_state();
        let session = state.store.create().unwrap();
        let speaker = Speaker::silent();

        let answer =
            run_chat_turn(&state, &session, "top speed?", Some("ghost"), &speaker).await;
        assert!(answer.contains("Ava Patel"));
    }

    #[tokio::test]
    async fn selected_athlete_flows_into_the_answer() {
        let state = fast_state();
        let session = state.store.create().unwrap();
        let speaker = Speaker::silent();

        let answer =
            run_chat_turn(&state, &session, "how is my passing", Some("p2"), &speaker).await;
        assert!(answer.contains("Diego Santos — speed"));
    }
}
