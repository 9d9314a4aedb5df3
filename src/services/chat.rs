//! Chat placeholder
//!
//! Answers every question with a canned acknowledgement that echoes the start
//! of the question. Retrieval-backed answers are not wired in.

use serde::Serialize;

/// Maximum number of question characters echoed back
pub const ECHO_LIMIT: usize = 100;

/// Source attributed to every canned reply
pub const DEFAULT_SOURCE: &str = "Part 1, Chapter 1";

/// Reply returned by the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub sources: Vec<String>,
}

/// First `ECHO_LIMIT` characters of `question`, never splitting a character.
pub fn echo_prefix(question: &str) -> &str {
    match question.char_indices().nth(ECHO_LIMIT) {
        Some((idx, _)) => &question[..idx],
        None => question,
    }
}

/// Build the canned reply for a question.
pub fn canned_reply(question: &str) -> ChatReply {
    ChatReply {
        response: format!("I can help you understand: {}...", echo_prefix(question)),
        sources: vec![DEFAULT_SOURCE.to_string()],
    }
}
