//! Groq chat completion client (OpenAI-compatible API)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::completion::{CompletionProvider, CompletionRequest};

/// HTTP client for `POST {base_url}/chat/completions`
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl GroqClient {
    /// Create a new client. The configured timeout bounds each request.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        tracing::info!(
            "Requesting completion from {} ({} messages)",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::completion(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::completion(format!(
                "Completion failed: HTTP {} - {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::completion(format!("Failed to parse completion response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::completion("No message content in completion response"))
    }

    async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn test_request_wire_format() {
        let request = CompletionRequest::new(
            "qwen/qwen3-32b",
            vec![ChatMessage::system("rules"), ChatMessage::user("hi")],
            0.3,
        );
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "qwen/qwen3-32b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"<think>hm</think>Hello"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("<think>hm</think>Hello")
        );
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = LlmConfig {
            base_url: "http://localhost:4000/v1/".into(),
            ..LlmConfig::default()
        };
        let client = GroqClient::new(&config, "key").unwrap();
        assert_eq!(
            client.endpoint("chat/completions"),
            "http://localhost:4000/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_completion_error() {
        let config = LlmConfig {
            base_url: "http://127.0.0.1:9/v1".into(),
            timeout_secs: 2,
            ..LlmConfig::default()
        };
        let client = GroqClient::new(&config, "key").unwrap();
        let request = CompletionRequest::new("m", vec![ChatMessage::user("hi")], 0.3);

        let result = client.complete(&request).await;
        assert!(matches!(result, Err(Error::Completion(_))));
    }
}
