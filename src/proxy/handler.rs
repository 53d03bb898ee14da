//! HTTP handlers for the LLM proxy
//!
//! - POST /api/generate-flashcards: turn study notes into question/answer pairs
//! - POST /api/chat: tutor chat with short history
//! - GET  /health: liveness probe

use super::parse::{extract_card_pairs, truncate_chars};
use super::types::*;
use super::upstream::{
    generate_with_retry, GenerationRequest, RetryPolicy, Role, TextGenerator, Turn, UpstreamError,
};
use crate::config::{LimitsConfig, StudyJournalConfig};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const DEFAULT_SUBJECT: &str = "General";
pub const EMPTY_REPLY: &str = "No reply generated";

const TUTOR_PROMPT: &str = "You are a friendly and knowledgeable AI tutor.
Your role is to help students.

INSTRUCTIONS:
- Be clear and concise
- Use examples
- If asked for notes, produce complete and well-structured notes";

/// Shared state for proxy handlers
#[derive(Clone)]
pub struct ProxyState {
    pub generator: Arc<dyn TextGenerator>,
    pub retry: RetryPolicy,
    pub limits: LimitsConfig,
    pub retry_after_secs: u64,
}

impl ProxyState {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &StudyJournalConfig) -> Self {
        Self {
            generator,
            retry: RetryPolicy::from_config(&config.llm),
            limits: config.limits.clone(),
            retry_after_secs: config.llm.retry_after_secs,
        }
    }
}

/// Create the proxy router with CORS and request tracing
pub fn proxy_router(state: ProxyState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate-flashcards", post(generate_flashcards))
        .route("/api/chat", post(chat))
        .with_state(state)
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}

// =============================================================================
// Error responses
// =============================================================================

fn error_response(status: StatusCode, error: ApiError) -> Response {
    (status, Json(error)).into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, ApiError::bad_request(message))
}

fn malformed_body(rejection: JsonRejection) -> Response {
    bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

fn upstream_failure(state: &ProxyState, err: UpstreamError) -> Response {
    if err.is_rate_limited() {
        tracing::warn!("{}", err);
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::rate_limited(state.retry_after_secs),
        );
    }
    tracing::error!("Upstream call failed: {}", err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::internal(err.to_string()),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn flashcard_prompt(notes: &str, subject: &str, count: i64) -> String {
    format!(
        "Analyze these notes and create {count} smart flashcards.

NOTES:
\"{notes}\"

SUBJECT: {subject}

INSTRUCTIONS:
1. Extract the main concepts
2. Write questions that test understanding
3. Answers complete but concise

ANSWER: Only a JSON array, nothing else!
[{{\"front\": \"question\", \"back\": \"answer\"}}]"
    )
}

/// POST /api/generate-flashcards
async fn generate_flashcards(
    State(state): State<ProxyState>,
    payload: Result<Json<GenerateFlashcardsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return malformed_body(rejection),
    };

    let notes = match request.notes.as_deref() {
        Some(notes) if !notes.trim().is_empty() => notes,
        _ => return bad_request("Notes are required and cannot be empty"),
    };
    let count = match request.number_of_cards {
        Some(n) if n >= 1 => n,
        _ => return bad_request("numberOfCards must be at least 1"),
    };
    let subject = request
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUBJECT);

    tracing::info!(subject, count, "Flashcard generation requested");

    let notes = truncate_chars(notes, state.limits.max_note_chars);
    let prompt = GenerationRequest::prompt(flashcard_prompt(&notes, subject, count));

    let text = match generate_with_retry(state.generator.as_ref(), &prompt, state.retry).await {
        Ok(text) => text,
        Err(e) => return upstream_failure(&state, e),
    };

    let flashcards: Vec<_> = extract_card_pairs(&text)
        .into_iter()
        .filter(|c| !c.front.trim().is_empty() && !c.back.trim().is_empty())
        .take(usize::try_from(count).unwrap_or(usize::MAX))
        .collect();

    tracing::debug!("Returning {} flashcards", flashcards.len());
    Json(GenerateFlashcardsResponse { flashcards }).into_response()
}

/// A history entry the model can use, or `None` for malformed turns
fn history_turn(value: &serde_json::Value, max_chars: usize) -> Option<Turn> {
    let role = value.get("role")?.as_str().filter(|r| !r.is_empty())?;
    let content = match value.get("content")? {
        serde_json::Value::String(s) if !s.is_empty() => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(Turn {
        role: if role == "user" { Role::User } else { Role::Model },
        text: truncate_chars(&content, max_chars),
    })
}

fn chat_request(request: &ChatRequest, message: &str, limits: &LimitsConfig) -> GenerationRequest {
    let history = request.history.as_deref().unwrap_or_default();
    let skip = history.len().saturating_sub(limits.max_history_turns);
    let mut turns: Vec<Turn> = history[skip..]
        .iter()
        .filter_map(|v| history_turn(v, limits.max_message_chars))
        .collect();
    turns.push(Turn {
        role: Role::User,
        text: truncate_chars(message, limits.max_message_chars),
    });

    let system = match request.context.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(context) => format!("{}\n\nCONTEXT: {}", TUTOR_PROMPT, context),
        None => TUTOR_PROMPT.to_string(),
    };

    GenerationRequest {
        system: Some(system),
        turns,
    }
}

/// POST /api/chat
async fn chat(
    State(state): State<ProxyState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return malformed_body(rejection),
    };

    let message = match request.message.as_deref() {
        Some(message) if !message.trim().is_empty() => message,
        _ => return bad_request("Message is required and cannot be empty"),
    };

    let generation = chat_request(&request, message, &state.limits);
    tracing::info!(turns = generation.turns.len(), "Chat requested");

    let text = match generate_with_retry(state.generator.as_ref(), &generation, state.retry).await
    {
        Ok(text) => text,
        Err(e) => return upstream_failure(&state, e),
    };

    let reply = if text.trim().is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        truncate_chars(&text, state.limits.max_reply_chars)
    };

    Json(ChatResponse {
        reply,
        success: true,
    })
    .into_response()
}
