use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::client::ChatMessage;

/// Keeps the assistant on topic regardless of what the client sends.
const SYSTEM_PROMPT: &str = "Bạn là trợ lý AI chỉ hỗ trợ các câu hỏi về học ngôn ngữ. \
    Nếu câu hỏi không liên quan đến ngôn ngữ, hãy trả lời: \
    'Xin lỗi, tôi chỉ hỗ trợ học ngôn ngữ.'";

pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

/// Client-supplied system messages are dropped; the app's own guard prompt
/// is always the one in effect.
#[instrument(skip(state, body), fields(messages = body.messages.len()))]
async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let messages: Vec<ChatMessage> = body
        .messages
        .into_iter()
        .filter(|m| m.role != "system")
        .collect();
    if messages.is_empty() {
        return Err(ApiError::Validation("messages must not be empty".into()));
    }

    let reply = state
        .llm
        .chat(SYSTEM_PROMPT, &messages)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    Ok(Json(ChatResponse { reply }))
}
