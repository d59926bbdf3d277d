//! Conversation session management

mod manager;

pub use manager::ConversationManager;
