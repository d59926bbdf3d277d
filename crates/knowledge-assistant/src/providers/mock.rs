//! Scripted completion provider for tests and offline runs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

use super::completion::{CompletionProvider, CompletionRequest};

enum ScriptedReply {
    Answer(String),
    Failure(String),
}

/// Replies from a queue of canned results and records every request
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    healthy: AtomicBool,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what `health_check` reports
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Queue a successful raw reply
    pub fn push_answer(&self, text: impl Into<String>) {
        self.replies.lock().push_back(ScriptedReply::Answer(text.into()));
    }

    /// Queue a failure
    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().push_back(ScriptedReply::Failure(message.into()));
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().push(request.clone());

        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Answer(text)) => Ok(text),
            Some(ScriptedReply::Failure(message)) => Err(Error::completion(message)),
            None => Err(Error::completion("no scripted reply left")),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[tokio::test]
    async fn test_replies_in_order_then_exhausts() {
        let provider = ScriptedProvider::new();
        provider.push_answer("one");
        provider.push_failure("boom");

        let request = CompletionRequest::new("m", vec![ChatMessage::user("q")], 0.3);

        assert_eq!(provider.complete(&request).await.unwrap(), "one");
        assert!(matches!(provider.complete(&request).await, Err(Error::Completion(m)) if m == "boom"));
        tokio_test::assert_err!(provider.complete(&request).await);
        assert_eq!(provider.call_count(), 3);
    }
}
