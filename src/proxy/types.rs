//! Request and response bodies for the proxy endpoints

use crate::managers::CardPair;
use serde::{Deserialize, Serialize};

// =============================================================================
// Flashcards
// =============================================================================

/// POST /api/generate-flashcards body.
///
/// Fields are optional so that missing values surface as 400 responses
/// with a message instead of extractor rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlashcardsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_cards: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateFlashcardsResponse {
    pub flashcards: Vec<CardPair>,
}

// =============================================================================
// Chat
// =============================================================================

/// A prior chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// POST /api/chat body.
///
/// History entries stay untyped so malformed turns can be dropped one by
/// one rather than rejecting the request. A missing or `null` history is
/// treated as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub success: bool,
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Errors
// =============================================================================

/// Error code sent with 503 when the model provider keeps rate limiting
pub const RATE_LIMITED_CODE: &str = "RATE_LIMITED";

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error: ApiErrorDetail,
    /// Seconds the caller should wait, set on rate limiting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
            retry_after: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(
                RATE_LIMITED_CODE,
                format!(
                    "Too many requests to the model. Try again in {} seconds.",
                    retry_after
                ),
            )
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashcards_request_camel_case() {
        let req: GenerateFlashcardsRequest =
            serde_json::from_str(r#"{"notes":"n","numberOfCards":4}"#).unwrap();
        assert_eq!(req.number_of_cards, Some(4));
        assert!(req.subject.is_none());
    }

    #[test]
    fn test_rate_limited_body() {
        let json = serde_json::to_value(ApiError::rate_limited(30)).unwrap();
        assert_eq!(json["error"]["code"], "RATE_LIMITED");
        assert_eq!(json["retryAfter"], 30);
    }

    #[test]
    fn test_bad_request_has_no_retry_after() {
        let json = serde_json::to_value(ApiError::bad_request("nope")).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json.get("retryAfter").is_none());
    }

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(req.history.unwrap_or_default().is_empty());
        assert!(req.context.is_none());
    }
}
