use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use nexgen_core::model::Reservation;

use crate::error::ApiError;
use crate::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let reservations = state.storage.fetch_reservations().await?;
    Ok(Json(reservations))
}
