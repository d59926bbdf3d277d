//! Turn handling and document replacement for one session at a time

use std::sync::Arc;
use std::time::Instant;

use crate::config::{AppConfig, IngestionConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::{clean_response, PromptBuilder};
use crate::ingestion::IngestPipeline;
use crate::providers::{CompletionProvider, CompletionRequest};
use crate::types::response::{ContextStats, ExtractedFile, IngestError, IngestReport};
use crate::types::{Session, Turn, Upload};

/// Applies uploads and user turns to an explicitly passed [`Session`].
///
/// The manager holds no conversation state of its own; callers own the
/// session and decide where it lives between interactions.
pub struct ConversationManager {
    provider: Arc<dyn CompletionProvider>,
    pipeline: Arc<IngestPipeline>,
    llm: LlmConfig,
    ingestion: IngestionConfig,
}

impl ConversationManager {
    /// Create a manager around a completion provider
    pub fn new(config: &AppConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self::with_pipeline(config, provider, Arc::new(IngestPipeline::new()))
    }

    /// Create a manager with a custom ingestion pipeline
    pub fn with_pipeline(
        config: &AppConfig,
        provider: Arc<dyn CompletionProvider>,
        pipeline: Arc<IngestPipeline>,
    ) -> Self {
        Self {
            provider,
            pipeline,
            llm: config.llm.clone(),
            ingestion: config.ingestion.clone(),
        }
    }

    pub fn ingestion_config(&self) -> &IngestionConfig {
        &self.ingestion
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Replace the session's documents with `uploads`.
    ///
    /// Skips extraction entirely when the filenames match the active ones
    /// or when nothing was uploaded.
    pub async fn ingest(&self, session: &mut Session, uploads: Vec<Upload>) -> Result<IngestReport> {
        let start = Instant::now();
        let names: Vec<String> = uploads.iter().map(|u| u.filename.clone()).collect();

        if uploads.is_empty() || session.documents().matches(&names) {
            tracing::info!(
                "Session {}: file set unchanged, skipping extraction",
                session.id()
            );
            return Ok(self.report(session, true, Vec::new(), Vec::new(), start));
        }

        let pipeline = Arc::clone(&self.pipeline);
        let outcome = tokio::task::spawn_blocking(move || pipeline.ingest(&uploads))
            .await
            .map_err(|e| Error::internal(format!("Ingestion task failed: {}", e)))?;

        session.replace_documents(outcome.documents);

        tracing::info!(
            "Session {}: {} files active, {} failed, {} context characters",
            session.id(),
            session.document_names().len(),
            outcome.errors.len(),
            session.document_context().chars().count()
        );

        Ok(self.report(session, false, outcome.files, outcome.errors, start))
    }

    fn report(
        &self,
        session: &Session,
        skipped: bool,
        files: Vec<ExtractedFile>,
        errors: Vec<IngestError>,
        start: Instant,
    ) -> IngestReport {
        let active = session.document_names().len();
        let message = if active == 0 {
            "No documents active.".to_string()
        } else {
            format!("{} files active.", active)
        };

        IngestReport {
            skipped,
            document_names: session.document_names().to_vec(),
            files,
            errors,
            context: ContextStats::measure(session.document_context(), &self.ingestion),
            message,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Build the outbound request for the session as it stands
    pub fn build_request(&self, session: &Session) -> CompletionRequest {
        CompletionRequest::new(
            self.llm.model.clone(),
            PromptBuilder::build_messages(session, self.ingestion.context_char_limit),
            self.llm.temperature,
        )
    }

    /// Append a user turn, ask the completion service, append its cleaned reply.
    ///
    /// On failure the user turn stays in the session and no assistant turn is
    /// added. No retry is attempted.
    pub async fn send_message(&self, session: &mut Session, text: &str) -> Result<Turn> {
        if text.trim().is_empty() {
            return Err(Error::bad_request("Message content must not be empty"));
        }

        session.push_turn(Turn::user(text));
        let request = self.build_request(session);

        tracing::info!(
            "Session {}: submitting {} messages to {} ({}, {} context characters)",
            session.id(),
            request.messages.len(),
            self.provider.name(),
            request.model,
            session.document_context().chars().count()
        );

        let raw = self.provider.complete(&request).await.map_err(|e| {
            tracing::error!("Session {}: completion failed: {}", session.id(), e);
            match e {
                Error::Completion(_) => e,
                other => Error::completion(other.to_string()),
            }
        })?;

        let turn = Turn::assistant(clean_response(&raw));
        session.push_turn(turn.clone());
        Ok(turn)
    }

    /// Start a new chat
    pub fn new_chat(&self, session: &mut Session) {
        session.reset();
        tracing::info!("Session {}: new chat", session.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{ExtractedText, TextExtractor};
    use crate::providers::ScriptedProvider;
    use crate::types::{DocumentKind, Role};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingExtractor(AtomicUsize);

    impl TextExtractor for CountingExtractor {
        fn extract(&self, _filename: &str, data: &[u8]) -> Result<ExtractedText> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ExtractedText {
                content: String::from_utf8_lossy(data).into_owned(),
                pages: None,
            })
        }
    }

    fn setup() -> (ConversationManager, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new());
        let manager = ConversationManager::new(&AppConfig::with_api_key("test"), provider.clone());
        (manager, provider)
    }

    fn txt(name: &str, body: &str) -> Upload {
        Upload::new(name, body.as_bytes().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_new_upload_replaces_previous_context() {
        let (manager, _) = setup();
        let mut session = Session::new();

        manager.ingest(&mut session, vec![txt("a.txt", "alpha")]).await.unwrap();
        let report = manager.ingest(&mut session, vec![txt("b.txt", "beta")]).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(session.document_context(), "beta\n");
        assert_eq!(session.document_names(), &["b.txt".to_string()][..]);
        assert_eq!(report.message, "1 files active.");
    }

    #[tokio::test]
    async fn test_identical_upload_extracts_once() {
        let counter = Arc::new(CountingExtractor(AtomicUsize::new(0)));
        let pipeline = IngestPipeline::new().with_extractor(DocumentKind::Txt, counter.clone());
        let manager = ConversationManager::with_pipeline(
            &AppConfig::with_api_key("test"),
            Arc::new(ScriptedProvider::new()),
            Arc::new(pipeline),
        );
        let mut session = Session::new();

        let first = manager.ingest(&mut session, vec![txt("a.txt", "alpha")]).await.unwrap();
        let second = manager.ingest(&mut session, vec![txt("a.txt", "alpha")]).await.unwrap();

        assert!(!first.skipped);
        assert!(second.skipped);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(session.document_context(), "alpha\n");
    }

    #[tokio::test]
    async fn test_fewer_copies_of_same_name_reingests() {
        let (manager, _) = setup();
        let mut session = Session::new();
        manager
            .ingest(&mut session, vec![txt("a.txt", "old1"), txt("a.txt", "old2")])
            .await
            .unwrap();

        let report = manager.ingest(&mut session, vec![txt("a.txt", "new")]).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(session.document_names(), &["a.txt".to_string()][..]);
        assert_eq!(session.document_context(), "new\n");
    }

    #[tokio::test]
    async fn test_empty_upload_keeps_documents() {
        let (manager, _) = setup();
        let mut session = Session::new();
        manager.ingest(&mut session, vec![txt("a.txt", "alpha")]).await.unwrap();

        let report = manager.ingest(&mut session, Vec::new()).await.unwrap();

        assert!(report.skipped);
        assert_eq!(session.document_context(), "alpha\n");
    }

    #[tokio::test]
    async fn test_send_message_appends_cleaned_reply() {
        let (manager, provider) = setup();
        let mut session = Session::new();
        provider.push_answer("<think>reasoning</think>Answer text");

        let turn = manager.send_message(&mut session, "What is it?").await.unwrap();

        assert_eq!(turn.content(), "Answer text");
        assert_eq!(turn.role(), Role::Assistant);
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0].content(), "What is it?");
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let (manager, provider) = setup();
        let mut session = Session::new();
        provider.push_answer("ok");

        manager.send_message(&mut session, "hello").await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.model, "qwen/qwen3-32b");
        assert_eq!(request.temperature, 0.3);
        assert!(!request.stream);
        assert_eq!(request.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_preserves_user_turn() {
        let (manager, provider) = setup();
        let mut session = Session::new();
        provider.push_failure("503 Service Unavailable");

        let err = manager
            .send_message(&mut session, "What is the deadline?")
            .await
            .unwrap_err();

        assert!(err.to_string().ends_with("Please contact admin."));
        assert_eq!(session.turns().len(), 1);
        let last = session.turns().last().unwrap();
        assert_eq!(last.role(), Role::User);
        assert_eq!(last.content(), "What is the deadline?");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_side_effects() {
        let (manager, provider) = setup();
        let mut session = Session::new();

        let result = manager.send_message(&mut session, "   ").await;

        assert!(matches!(result, Err(Error::BadRequest(_))));
        assert!(session.turns().is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_carries_at_most_limit_characters() {
        let (manager, provider) = setup();
        let mut session = Session::new();
        let long = "z".repeat(20_000);
        manager.ingest(&mut session, vec![txt("long.txt", &long)]).await.unwrap();
        provider.push_answer("ok");

        manager.send_message(&mut session, "summarize").await.unwrap();

        let system = &provider.requests()[0].messages[0].content;
        let included = system.split("DOCUMENT CONTEXT:\n").nth(1).unwrap();
        assert_eq!(included.chars().count(), 15_000);
    }

    #[tokio::test]
    async fn test_new_chat_resets_after_activity() {
        let (manager, provider) = setup();
        let mut session = Session::new();
        manager.ingest(&mut session, vec![txt("a.txt", "alpha")]).await.unwrap();
        provider.push_answer("ok");
        manager.send_message(&mut session, "q").await.unwrap();

        manager.new_chat(&mut session);

        assert!(session.turns().is_empty());
        assert!(session.document_context().is_empty());
        assert!(session.document_names().is_empty());
    }
}
