use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use nexgen_core::stats::{Analytics, DashboardStats};

use crate::error::ApiError;
use crate::AppState;

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, ApiError> {
    let projects = state.storage.fetch_projects().await?;
    Ok(Json(DashboardStats::from_projects(&projects)))
}

pub async fn analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Analytics>, ApiError> {
    let projects = state.storage.fetch_projects().await?;
    Ok(Json(Analytics::from_projects(&projects)))
}
