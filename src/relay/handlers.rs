//! HTTP request handlers

use super::types::{ChatReply, ChatRequest, ErrorResponse, VersionResponse};
use super::AppState;
use crate::llm::LlmError;
use crate::system_prompt;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

/// Longest prefix of a user message written to the log
const LOG_PREVIEW_CHARS: usize = 80;

/// Create the relay router
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, RelayError> {
    let request_id = Uuid::new_v4();
    relay_message(&state, payload)
        .instrument(tracing::info_span!("chat", %request_id))
        .await
        .map(Json)
}

async fn relay_message(
    state: &AppState,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ChatReply, RelayError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected malformed chat body");
            return Err(RelayError::InvalidRequest);
        }
    };

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or(RelayError::InvalidRequest)?;

    tracing::info!(
        chars = message.chars().count(),
        preview = %preview(&message),
        "Received message"
    );

    let response = state
        .llm
        .complete(&system_prompt::build_request(&message))
        .await?;

    tracing::info!(reply_chars = response.text.chars().count(), "Reply relayed");

    Ok(ChatReply {
        reply: response.text,
    })
}

async fn get_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        model: state.llm.model_id().to_string(),
    })
}

fn preview(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

// ============================================================
// Error Handling
// ============================================================

/// Failures surfaced to relay callers
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing, null, blank, or undecodable `message`
    #[error("Message is required")]
    InvalidRequest,
    /// The upstream completion call failed
    #[error("API error: {0}")]
    Upstream(#[from] LlmError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayError::InvalidRequest => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Message is required"),
            ),
            RelayError::Upstream(e) => {
                tracing::error!(error = %e.message, kind = e.kind.as_str(), "Upstream call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("API error").with_details(e.message),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
