//! Prompt assembly and response cleanup

pub mod postprocess;
pub mod prompt;

pub use postprocess::clean_response;
pub use prompt::{PromptBuilder, NO_REASONING_REMINDER, SYSTEM_RULES};
