//! HTTP surface: `/health` and the streaming `/generate` endpoint.

use crate::pipeline::Relay;
use askrelay_core::{AppConfig, AppResult, CivilClock};
use askrelay_prompt::{null_as_default, trim_history, ConversationTurn};
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const PLAIN_TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    relay: Arc<Relay>,
    clock: CivilClock,
    service_name: String,
}

impl AppState {
    pub fn new(relay: Arc<Relay>, clock: CivilClock, service_name: impl Into<String>) -> Self {
        Self {
            relay,
            clock,
            service_name: service_name.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(Relay::from_config(config)?),
            config.clock()?,
            config.service_name.clone(),
        ))
    }

    pub fn relay(&self) -> &Arc<Relay> {
        &self.relay
    }
}

/// Body of `POST /generate`. Missing and `null` fields fall back to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_history: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

/// Build the router. CORS is wide open on every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: state.clock.timestamp(),
        service: state.service_name.clone(),
    })
}

async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let received = request.chat_history.len();
    let history = trim_history(request.chat_history);

    tracing::info!(
        question_len = request.question.len(),
        history_turns = history.len(),
        history_dropped = received - history.len(),
        "Generate request"
    );

    let fragments = state.relay.clone().answer(request.question, history);

    (
        [(header::CONTENT_TYPE, PLAIN_TEXT_UTF8)],
        Body::from_stream(fragments.map(Ok::<_, Infallible>)),
    )
        .into_response()
}
