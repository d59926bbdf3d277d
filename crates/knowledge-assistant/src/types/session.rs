//! Conversation session state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::turn::Turn;

/// Extracted text of the active upload together with the filenames it came from.
///
/// The two halves only ever change together: a new upload replaces the whole
/// set, never merges into it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSet {
    names: Vec<String>,
    context: String,
}

impl DocumentSet {
    pub fn new(names: Vec<String>, context: String) -> Self {
        Self { names, context }
    }

    /// Filenames in upload order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Concatenated extracted text
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `names` identifies the same files, ignoring order.
    ///
    /// Repeated names count: two `a.txt` uploads differ from one.
    pub fn matches(&self, names: &[String]) -> bool {
        if self.names.len() != names.len() {
            return false;
        }
        let mut current: Vec<&str> = self.names.iter().map(String::as_str).collect();
        let mut incoming: Vec<&str> = names.iter().map(String::as_str).collect();
        current.sort_unstable();
        incoming.sort_unstable();
        current == incoming
    }
}

/// Full state of one conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    turns: Vec<Turn>,
    documents: DocumentSet,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            turns: Vec::new(),
            documents: DocumentSet::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Turns in chat order, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn document_context(&self) -> &str {
        self.documents.context()
    }

    pub fn document_names(&self) -> &[String] {
        self.documents.names()
    }

    /// Append a turn
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Swap in a freshly ingested document set
    pub fn replace_documents(&mut self, documents: DocumentSet) {
        self.documents = documents;
    }

    /// Start a new chat: clears turns and documents in one step
    pub fn reset(&mut self) {
        self.turns.clear();
        self.documents = DocumentSet::default();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
