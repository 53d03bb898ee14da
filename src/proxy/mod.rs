//! LLM proxy service
//!
//! A small axum service that forwards flashcard-generation and tutor-chat
//! requests to the model provider, so the API key never leaves the server.
//! Rate-limited upstream calls are retried with linear backoff; exhaustion
//! is reported to callers as 503 with a `retryAfter` hint.

pub mod client;
pub mod handler;
pub mod parse;
pub mod types;
pub mod upstream;

pub use client::ProxyClient;
pub use handler::{proxy_router, ProxyState};
pub use types::*;
pub use upstream::{
    generate_with_retry, GeminiClient, GenerationRequest, RetryPolicy, Role, TextGenerator, Turn,
    UpstreamError,
};
