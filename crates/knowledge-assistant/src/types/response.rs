//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentKind;
use super::session::Session;
use super::turn::Turn;
use crate::config::IngestionConfig;

/// Size of the active document context relative to the prompt budget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ContextStats {
    /// Characters of extracted text held by the session
    pub characters: usize,
    /// Characters admitted into each prompt
    pub limit: usize,
    /// Characters actually sent, `min(characters, limit)`
    pub included_characters: usize,
    /// Gauge reading in [0, 1]
    pub fill_ratio: f32,
}

impl ContextStats {
    /// Measure a context string
    pub fn measure(context: &str, config: &IngestionConfig) -> Self {
        let characters = context.chars().count();
        let fill_ratio = if config.context_gauge_chars == 0 {
            1.0
        } else {
            (characters as f32 / config.context_gauge_chars as f32).min(1.0)
        };

        Self {
            characters,
            limit: config.context_char_limit,
            included_characters: characters.min(config.context_char_limit),
            fill_ratio,
        }
    }
}

/// Text extracted from one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFile {
    /// Filename
    pub filename: String,
    /// Detected format
    pub kind: DocumentKind,
    /// Characters extracted
    pub characters: usize,
    /// Number of pages (if applicable)
    pub pages: Option<u32>,
}

/// Error during ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestError {
    /// Filename that failed
    pub filename: String,
    /// Error message
    pub error: String,
}

/// Response from document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// True when the file set was unchanged and nothing was re-extracted
    pub skipped: bool,
    /// Filenames of the active document set
    pub document_names: Vec<String>,
    /// Files extracted by this upload
    pub files: Vec<ExtractedFile>,
    /// Per-file failures (partial success)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<IngestError>,
    /// Resulting context size
    pub context: ContextStats,
    /// Human readable status line
    pub message: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Request body for a new user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Question text
    pub content: String,
}

/// Assistant reply to a user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The appended assistant turn
    pub turn: Turn,
    /// Turns in the session after the reply
    pub turn_count: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session ID
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Conversation so far
    pub turns: Vec<Turn>,
    /// Active filenames
    pub document_names: Vec<String>,
    /// Active context size
    pub context: ContextStats,
}

impl SessionSummary {
    pub fn from_session(session: &Session, config: &IngestionConfig) -> Self {
        Self {
            id: session.id(),
            created_at: session.created_at(),
            turns: session.turns().to_vec(),
            document_names: session.document_names().to_vec(),
            context: ContextStats::measure(session.document_context(), config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_stats_caps() {
        let config = IngestionConfig::default();

        let small = ContextStats::measure("hello", &config);
        assert_eq!(small.characters, 5);
        assert_eq!(small.included_characters, 5);
        assert!(small.fill_ratio < 0.01);

        let big = "x".repeat(60_000);
        let stats = ContextStats::measure(&big, &config);
        assert_eq!(stats.included_characters, 15_000);
        assert_eq!(stats.fill_ratio, 1.0);
    }

    #[test]
    fn test_context_stats_counts_characters_not_bytes() {
        let stats = ContextStats::measure("héllo wörld", &IngestionConfig::default());
        assert_eq!(stats.characters, 11);
    }
}
