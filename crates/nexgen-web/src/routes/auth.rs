use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use nexgen_core::session::Session;
use nexgen_core::storage::StorageBackend;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state.storage.sign_in(&req.email, &req.password).await?;
    tracing::info!("signed in as {}", session.email());
    state.sessions.set(Some(session.clone()));
    Ok(Json(session))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    if let Some(session) = state.sessions.current() {
        // a failed remote logout still clears the local session
        if let Err(e) = state.storage.sign_out(&session.access_token).await {
            tracing::warn!("remote sign-out failed: {}", e);
        }
        state.sessions.set(None);
    }
    Ok(Json(json!({"signedOut": true})))
}

pub async fn session(State(state): State<Arc<AppState>>) -> Json<Option<Session>> {
    Json(state.sessions.current())
}
