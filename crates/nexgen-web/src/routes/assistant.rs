use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use nexgen_core::assistant::Assistant;

use crate::AppState;

/// These handlers never fail: a missing API key or an upstream outage
/// comes back as a fixed message in the payload, the same string the
/// dashboard would show.
pub async fn briefing(State(state): State<Arc<AppState>>) -> Json<Value> {
    let reservations = match state.storage.fetch_reservations().await {
        Ok(reservations) => reservations,
        Err(e) => {
            tracing::warn!("reservation fetch failed, briefing over empty book: {}", e);
            Vec::new()
        }
    };

    let assistant = Assistant::new(state.llm.as_ref());
    let briefing = assistant.shift_briefing(&reservations).await;
    Json(json!({ "briefing": briefing }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<Value> {
    let reservations = state.storage.fetch_reservations().await.unwrap_or_default();

    let assistant = Assistant::new(state.llm.as_ref());
    let reply = assistant.chat(&req.message, &reservations).await;
    Json(json!({ "reply": reply }))
}
