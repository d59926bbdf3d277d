//! Configuration for the knowledge assistant

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the completion service key (required)
pub const COMPLETION_API_KEY_VAR: &str = "GROQ_API_KEY";
/// Environment variable holding the alternate inference provider key (optional)
pub const ALTERNATE_API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

/// Main assistant configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Completion service configuration
    pub llm: LlmConfig,
    /// Document ingestion configuration
    pub ingestion: IngestionConfig,
    /// API keys
    pub secrets: Secrets,
}

impl AppConfig {
    /// Default configuration around a known completion key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            ingestion: IngestionConfig::default(),
            secrets: Secrets::new(api_key.into(), None),
        }
    }

    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let completion_key = lookup(COMPLETION_API_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::MissingSecret(COMPLETION_API_KEY_VAR.to_string()))?;
        let alternate_key = lookup(ALTERNATE_API_KEY_VAR).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            secrets: Secrets::new(completion_key, alternate_key),
            ..Self::with_api_key(String::new())
        };

        if let Some(host) = lookup("ASSISTANT_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("ASSISTANT_PORT") {
            config.server.port = parse_var("ASSISTANT_PORT", &port)?;
        }
        if let Some(url) = lookup("GROQ_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("ASSISTANT_MODEL") {
            config.llm.model = model;
        }
        if let Some(timeout) = lookup("ASSISTANT_TIMEOUT_SECS") {
            config.llm.timeout_secs = parse_var("ASSISTANT_TIMEOUT_SECS", &timeout)?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", key, e)))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "qwen/qwen3-32b".to_string(),
            temperature: 0.3, // Low for answers that stay close to the documents
            timeout_secs: 120,
        }
    }
}

/// Document ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Characters of document context included in each prompt
    pub context_char_limit: usize,
    /// Context size at which the usage gauge reads full
    pub context_gauge_chars: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            context_char_limit: 15_000,
            context_gauge_chars: 50_000,
        }
    }
}

/// API keys read at startup
#[derive(Debug, Clone)]
pub struct Secrets {
    completion_api_key: Secret<String>,
    alternate_api_key: Option<Secret<String>>,
}

impl Secrets {
    /// Wrap raw key material
    pub fn new(completion_api_key: String, alternate_api_key: Option<String>) -> Self {
        Self {
            completion_api_key: Secret::new(completion_api_key),
            alternate_api_key: alternate_api_key.map(Secret::new),
        }
    }

    /// Key for the completion service
    pub fn completion_api_key(&self) -> &str {
        self.completion_api_key.expose_secret()
    }

    /// Whether the alternate inference provider key is configured
    pub fn has_alternate_key(&self) -> bool {
        self.alternate_api_key.is_some()
    }
}
