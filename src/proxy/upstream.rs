//! Upstream text generation
//!
//! [`TextGenerator`] is the seam between the HTTP handlers and the model
//! provider. [`GeminiClient`] talks to the Gemini `generateContent` REST API;
//! tests substitute scripted fakes. [`generate_with_retry`] wraps any
//! generator with linear backoff on rate limiting.

use crate::config::LlmConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from the model provider
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    #[error("Rate limited by the model provider after {attempts} attempt(s)")]
    RateLimited { attempts: u32 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API key not configured")]
    MissingApiKey,

    /// The proxy gave up on a rate-limited provider; retry after the hint
    #[error("Proxy is rate limited, retry in {retry_after}s")]
    Throttled { retry_after: u64 },
}

impl UpstreamError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Throttled { .. })
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Provider-neutral generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
}

impl GenerationRequest {
    /// Single user prompt without a system instruction
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            system: None,
            turns: vec![Turn {
                role: Role::User,
                text: text.into(),
            }],
        }
    }
}

/// Produces text for a request. May return an empty string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, UpstreamError>;
}

// =============================================================================
// Retry
// =============================================================================

/// Linear backoff on rate limiting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Wait after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default())
    }
}

/// Call `generator`, retrying only rate-limited attempts.
///
/// Other errors are returned immediately. Exhausting the attempts yields
/// [`UpstreamError::RateLimited`] with the number of attempts made.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    policy: RetryPolicy,
) -> Result<String, UpstreamError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        tracing::debug!(attempt, max_attempts, "Calling model");
        match generator.generate(request).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_rate_limited() => {
                if attempt >= max_attempts {
                    tracing::warn!("Rate limited on all {} attempts", attempt);
                    return Err(UpstreamError::RateLimited { attempts: attempt });
                }
                let wait = policy.delay_after(attempt);
                tracing::warn!("Rate limited, retrying in {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// =============================================================================
// Gemini
// =============================================================================

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build from config, resolving the API key from the environment.
    ///
    /// A missing key is not an error here; every call then fails with
    /// [`UpstreamError::MissingApiKey`].
    pub fn new(config: &LlmConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!("{} is not set; model calls will fail", config.api_key_env);
        }
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystem<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: Role,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiSystem<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

fn build_body(request: &GenerationRequest) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: request
            .turns
            .iter()
            .map(|t| GeminiContent {
                role: t.role,
                parts: vec![GeminiPart { text: &t.text }],
            })
            .collect(),
        system_instruction: request.system.as_deref().map(|s| GeminiSystem {
            parts: vec![GeminiPart { text: s }],
        }),
    }
}

/// Map a non-success response to an error; 429 and `RESOURCE_EXHAUSTED`
/// count as rate limiting
fn classify_failure(status: u16, body: &str) -> UpstreamError {
    let detail = serde_json::from_str::<GeminiErrorBody>(body).ok();
    let exhausted = detail
        .as_ref()
        .is_some_and(|d| d.error.status == "RESOURCE_EXHAUSTED");
    if status == 429 || exhausted {
        return UpstreamError::RateLimited { attempts: 1 };
    }
    let message = match detail {
        Some(d) if !d.error.message.is_empty() => d.error.message,
        _ => body.to_string(),
    };
    UpstreamError::Api { status, message }
}

fn collect_text(response: GeminiResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default()
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;
        Ok(collect_text(parsed))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted outcomes, then repeats the last one
    pub struct ScriptedGenerator {
        outcomes: Mutex<VecDeque<Result<String, UpstreamError>>>,
        last: Mutex<Option<Result<String, UpstreamError>>>,
        pub calls: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        pub fn new(outcomes: Vec<Result<String, UpstreamError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                last: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<GenerationRequest> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
            self.calls.lock().unwrap().push(request.clone());
            let next = self.outcomes.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            match next {
                Some(outcome) => {
                    *last = Some(outcome.clone());
                    outcome
                }
                None => last.clone().unwrap_or(Ok(String::new())),
            }
        }
    }
}
