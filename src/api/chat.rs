//! Chat endpoint
//!
//! - POST /chat/query - Canned acknowledgement of the question

use axum::{routing::post, Json, Router};
use serde::Deserialize;

use crate::api::middleware::AppState;
use crate::services::chat::{canned_reply, ChatReply};

/// Request body for a chat query
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Selected page text; accepted but not yet used for answering
    #[serde(default)]
    pub context: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/query", post(query))
}

/// POST /chat/query
async fn query(Json(body): Json<ChatRequest>) -> Json<ChatReply> {
    tracing::debug!(
        "Chat query ({} chars, {} chars of context)",
        body.question.chars().count(),
        body.context.chars().count()
    );
    Json(canned_reply(&body.question))
}
