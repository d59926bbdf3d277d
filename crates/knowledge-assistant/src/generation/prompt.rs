//! Prompt assembly for document-grounded chat

use crate::types::{ChatMessage, Session};

/// Fixed behavioral rules placed ahead of the document context
pub const SYSTEM_RULES: &str = "You are an intelligent assistant. Your task is to analyze the uploaded documents, \
extract information, summarize, evaluate performance, provide suggestions, and give guidance \
when asked. Follow these rules exactly:
1. Answer based on the document content and provide guidance if the user asks.
2. You may summarize or infer insights to help the user, do not output 'No information available in the document related to your question' unless no info exists.
3. Do NOT include internal tags like <think> or explanations of your reasoning.
4. Keep the answers concise, clear, and helpful.
";

/// Second instruction message, repeated on every request
pub const NO_REASONING_REMINDER: &str =
    "STRICT RULE: remove any <think> tags and provide clean responses.";

/// Prompt builder for session turns
pub struct PromptBuilder;

impl PromptBuilder {
    /// First `limit` characters of `context`, cut on a character boundary
    pub fn truncate_context(context: &str, limit: usize) -> &str {
        match context.char_indices().nth(limit) {
            Some((byte_idx, _)) => &context[..byte_idx],
            None => context,
        }
    }

    /// System message: rules followed by the clipped document context
    pub fn system_instructions(context: &str, limit: usize) -> String {
        format!(
            "{rules}\nDOCUMENT CONTEXT:\n{context}",
            rules = SYSTEM_RULES,
            context = Self::truncate_context(context, limit)
        )
    }

    /// Full outbound message list: two instruction messages, then every turn oldest first
    pub fn build_messages(session: &Session, limit: usize) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(session.turns().len() + 2);
        messages.push(ChatMessage::system(Self::system_instructions(
            session.document_context(),
            limit,
        )));
        messages.push(ChatMessage::user(NO_REASONING_REMINDER));
        messages.extend(session.turns().iter().map(ChatMessage::from));
        messages
    }
}
