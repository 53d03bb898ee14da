//! StudyJournal configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main StudyJournal configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyJournalConfig {
    /// Proxy server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream model configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Request/response size limits for the proxy
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Proxy client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

impl StudyJournalConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Proxy server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

/// Upstream model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,

    /// API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Attempts per request when the upstream rate-limits
    pub max_attempts: u32,

    /// Base backoff between attempts; attempt `n` waits `n * retry_delay_ms`
    pub retry_delay_ms: u64,

    /// Upstream request timeout
    pub request_timeout_secs: u64,

    /// Retry hint returned to callers on 503
    pub retry_after_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            max_attempts: 3,
            retry_delay_ms: 2000,
            request_timeout_secs: 60,
            retry_after_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the configured environment variable.
    ///
    /// Tries the exact name first, then the UPPER_CASE form.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .or_else(|_| std::env::var(self.api_key_env.to_uppercase()))
            .ok()
            .filter(|k| !k.is_empty())
    }
}

/// Size limits applied by the proxy before calling the upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Notes longer than this are truncated before flashcard generation
    pub max_note_chars: usize,

    /// Chat message and per-turn history truncation
    pub max_message_chars: usize,

    /// Most recent history turns forwarded to the model
    pub max_history_turns: usize,

    /// Reply truncation
    pub max_reply_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_note_chars: 2500,
            max_message_chars: 800,
            max_history_turns: 6,
            max_reply_chars: 5000,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the persisted document
    pub data_file: PathBuf,

    /// Autosave period in seconds
    pub autosave_interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs_next::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studyjournal");

        Self {
            data_file: base.join("studyjournal_data.json"),
            autosave_interval_secs: 30,
        }
    }
}

/// Proxy client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the running proxy
    pub proxy_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}
