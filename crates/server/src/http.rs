//! HTTP API
//!
//! REST surface for the chat store plus the read-only context endpoints at
//! the collaborator boundary (athletes, goals, diary, readiness).

use axum::extract::{Path, Query, State};
use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use coach_agent_chat::{ChatError, SessionSnapshot};
use coach_agent_core::{DiaryEntry, FatigueLevel, Goal, Persona};
use coach_agent_voice::Speaker;

use crate::coach::run_chat_turn;
use crate::error::ServerError;
use crate::state::AppState;
use crate::websocket;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(health))
        .route("/api/me", get(me))
        .route("/api/athletes", get(list_athletes))
        .route("/api/athletes/:id", get(get_athlete))
        .route("/api/goals", get(goals))
        .route("/api/diary", get(diary))
        .route("/api/readiness/today", get(readiness_today))
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/activate", post(activate_session))
        .route("/api/sessions/:id/personas", put(replace_personas))
        .route("/api/sessions/:id/speaking", post(toggle_speaking))
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/ws", get(websocket::handle_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS restricted to the configured frontend origin; an unparseable origin
/// falls back to allowing any, which only matters in development.
fn cors_layer(state: &AppState) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    match state.get_config().server.cors_origin.parse::<axum::http::HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => cors.allow_origin(Any),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Identity of the demo athlete
#[derive(Debug, Serialize)]
struct MeResponse {
    id: String,
    name: String,
    sport: String,
    position: String,
    team: String,
}

async fn me(State(state): State<AppState>) -> Json<MeResponse> {
    let athlete = state.context.default_athlete();
    Json(MeResponse {
        id: athlete.id.clone(),
        name: athlete.name.clone(),
        sport: athlete.sport.clone(),
        position: athlete.position.clone(),
        team: athlete.team.clone(),
    })
}

async fn list_athletes(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "athletes": state.context.athletes() }))
}

async fn get_athlete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let athlete = state
        .context
        .athlete(&id)
        .ok_or_else(|| ServerError::NotFound(format!("athlete {id}")))?;
    Ok(Json(serde_json::json!(athlete)))
}

async fn goals(State(state): State<AppState>) -> Json<Vec<Goal>> {
    Json(state.context.external().goals.clone())
}

async fn diary(State(state): State<AppState>) -> Json<Vec<DiaryEntry>> {
    Json(state.context.external().diary.clone())
}

#[derive(Debug, Deserialize)]
struct ReadinessQuery {
    athlete_id: Option<String>,
}

/// Today's readiness with the derived recommendation
#[derive(Debug, Serialize)]
struct ReadinessToday {
    sleep_score: u32,
    hr_rest: u32,
    hrv: u32,
    fatigue: FatigueLevel,
    recommendation: String,
}

async fn readiness_today(
    State(state): State<AppState>,
    Query(query): Query<ReadinessQuery>,
) -> Json<ReadinessToday> {
    let athlete_id = query
        .athlete_id
        .unwrap_or_else(|| state.context.default_athlete().id.clone());
    let snapshot = state.context.readiness_for(&athlete_id);

    Json(ReadinessToday {
        sleep_score: snapshot.sleep_score,
        hr_rest: snapshot.hr_rest,
        hrv: snapshot.hrv,
        recommendation: snapshot.recommendation().to_string(),
        fatigue: snapshot.fatigue,
    })
}

async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    let session = state.store.create()?;
    Ok(Json(session.snapshot()))
}

async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionSnapshot>> {
    Json(state.store.list())
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    let session = state
        .store
        .get(id)
        .ok_or(ChatError::SessionNotFound(id))?;
    Ok(Json(session.snapshot()))
}

async fn activate_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.store.activate(id)?;
    Ok(Json(serde_json::json!({ "active": id })))
}

#[derive(Debug, Deserialize)]
struct PersonaBody {
    personas: Vec<Persona>,
}

#[derive(Debug, Serialize)]
struct PersonaResponse {
    applied: bool,
    personas: Vec<Persona>,
}

async fn replace_personas(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PersonaBody>,
) -> Result<Json<PersonaResponse>, ServerError> {
    let session = state
        .store
        .get(id)
        .ok_or(ChatError::SessionNotFound(id))?;
    let applied = session.replace_personas(body.personas);
    Ok(Json(PersonaResponse {
        applied,
        personas: session.personas(),
    }))
}

async fn toggle_speaking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state
        .store
        .get(id)
        .ok_or(ChatError::SessionNotFound(id))?;
    let speaking = session.toggle_speaking();
    Ok(Json(serde_json::json!({ "speaking": speaking })))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    question: String,
    #[serde(default)]
    athlete_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    answer: String,
}

/// Synchronous chat: the response carries the finalized answer once the
/// reveal has completed. Speech output needs an audio channel, so the HTTP
/// path always runs with the silent speaker; clients wanting audio use the
/// session WebSocket.
async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ServerError> {
    if body.question.trim().is_empty() {
        return Err(ServerError::BadRequest("Question must not be empty".into()));
    }

    let session = state
        .store
        .get(id)
        .ok_or(ChatError::SessionNotFound(id))?;

    let speaker = Speaker::silent();
    let answer = run_chat_turn(
        &state,
        &session,
        &body.question,
        body.athlete_id.as_deref(),
        &speaker,
    )
    .await;

    Ok(Json(ChatResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use coach_agent_config::Settings;
    use tower::ServiceExt;

    fn app() -> (AppState, Router) {
        let mut settings = Settings::default();
        settings.chat.reveal_interval_ms = 1;
        let state = AppState::new(settings);
        let router = create_router(state.clone());
        (state, router)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (_, router) = app();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_then_fetch_session() {
        let (_, router) = app();

        let response = router
            .clone()
            .oneshot(Request::post("/api/sessions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["title"], "Session 1");
        assert_eq!(created["speaking"], true);

        let response = router
            .oneshot(
                Request::get(format!("/api/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["id"], id.as_str());
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let (_, router) = app();
        let response = router
            .oneshot(
                Request::get(format!("/api/sessions/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_persona_replacement_is_ignored() {
        let (state, router) = app();
        let session = state.store.create().unwrap();

        let response = router
            .oneshot(
                Request::put(format!("/api/sessions/{}/personas", session.id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"personas":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["applied"], false);
        assert_eq!(body["personas"], serde_json::json!(["calm_mentor"]));
    }

    #[tokio::test]
    async fn chat_returns_the_finalized_answer() {
        let (state, router) = app();
        let session = state.store.create().unwrap();

        let response = router
            .oneshot(
                Request::post(format!("/api/sessions/{}/chat", session.id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"question":"breathing before the match"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let answer = body["answer"].as_str().unwrap();
        assert!(answer.contains("Mental routine prepared."));
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let (state, router) = app();
        let session = state.store.create().unwrap();

        let response = router
            .oneshot(
                Request::post(format!("/api/sessions/{}/chat", session.id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"question":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn readiness_reports_recommendation() {
        let (_, router) = app();
        let response = router
            .oneshot(
                Request::get("/api/readiness/today")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fatigue"], "moderate");
        assert!(body["recommendation"]
            .as_str()
            .unwrap()
            .contains("moderately recovered"));
    }
}
