//! Completion service providers

pub mod completion;
pub mod groq;
pub mod mock;

pub use completion::{CompletionProvider, CompletionRequest};
pub use groq::GroqClient;
pub use mock::ScriptedProvider;
