//! Server error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coach_agent_chat::ChatError;
use thiserror::Error;

/// Server error
#[derive(Debug, Error)]
pub enum ServerError {
    /// Chat store operation failed
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request payload was unusable
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Chat(ChatError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Chat(ChatError::Capacity(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn status_codes_match_error_kinds() {
        let response =
            ServerError::Chat(ChatError::SessionNotFound(Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ServerError::Chat(ChatError::Capacity(10)).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = ServerError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
