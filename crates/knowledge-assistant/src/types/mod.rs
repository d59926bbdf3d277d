//! Core types for the knowledge assistant

pub mod document;
pub mod response;
pub mod session;
pub mod turn;

pub use document::{DocumentKind, Upload};
pub use response::{ContextStats, IngestReport, MessageRequest, MessageResponse, SessionSummary};
pub use session::{DocumentSet, Session};
pub use turn::{ChatMessage, Role, Turn};
