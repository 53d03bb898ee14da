//! Client for a running proxy

use super::types::*;
use super::upstream::UpstreamError;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::managers::CardPair;
use std::time::Duration;

/// Calls the proxy endpoints over HTTP
#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_base_url(&config.proxy_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Ask the proxy for up to `count` cards generated from `notes`
    pub async fn generate_flashcards(
        &self,
        notes: &str,
        subject: Option<&str>,
        count: u32,
    ) -> Result<Vec<CardPair>> {
        let body = GenerateFlashcardsRequest {
            notes: Some(notes.to_string()),
            subject: subject.map(str::to_string),
            number_of_cards: Some(i64::from(count)),
        };
        let response: GenerateFlashcardsResponse =
            self.post("/api/generate-flashcards", &body).await?;
        Ok(response.flashcards)
    }

    /// Send a chat message with prior turns and optional context
    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
        context: Option<&str>,
    ) -> Result<String> {
        let body = ChatRequest {
            message: Some(message.to_string()),
            history: Some(
                history
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<Vec<_>, serde_json::Error>>()?,
            ),
            context: context.map(str::to_string),
        };
        let response: ChatResponse = self.post("/api/chat", &body).await?;
        Ok(response.reply)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(failure(status, text).into());
        }

        Ok(response.json().await?)
    }
}

/// Map a non-success proxy reply, keeping rate limiting distinct
fn failure(status: reqwest::StatusCode, text: String) -> UpstreamError {
    match serde_json::from_str::<ApiError>(&text) {
        Ok(body)
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
                && body.error.code == RATE_LIMITED_CODE =>
        {
            UpstreamError::Throttled {
                retry_after: body.retry_after.unwrap_or_default(),
            }
        }
        Ok(body) => UpstreamError::Api {
            status: status.as_u16(),
            message: body.error.message,
        },
        Err(_) => UpstreamError::Api {
            status: status.as_u16(),
            message: text,
        },
    }
}
