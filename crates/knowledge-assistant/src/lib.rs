//! knowledge-assistant: chat with your own documents
//!
//! Upload PDF, Word or plain-text files into a session, then ask questions.
//! The extracted text is sent as context to a hosted chat-completion model
//! that answers from the documents only. An axum server and an optional
//! terminal client sit on top of the same [`ConversationManager`].

pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use conversation::ConversationManager;
pub use error::{Error, Result};
pub use server::AssistantServer;
pub use types::{
    document::{DocumentKind, Upload},
    response::{IngestReport, MessageResponse, SessionSummary},
    session::Session,
    turn::{Role, Turn},
};
