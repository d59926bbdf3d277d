//! Completion provider trait for generating assistant turns

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ChatMessage;

/// One non-streaming chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Ordered message list
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Always false: the reply is awaited as a single unit
    pub stream: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            stream: false,
        }
    }
}

/// Trait for chat completion services
///
/// Implementations:
/// - `GroqClient`: OpenAI-compatible hosted API
/// - `ScriptedProvider`: canned replies for tests and offline runs
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit the request and return the raw text of the generated message
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Check if the provider is reachable with the configured credentials
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
