use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use nexgen_core::model::ServiceType;
use nexgen_core::pricing::{self, Quote};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FeatureQuery {
    pub service: Option<ServiceType>,
}

/// Catalog of pricing add-ons, optionally filtered to one service
/// category. Category-neutral add-ons always appear.
pub async fn features(
    State(_state): State<Arc<AppState>>,
    Query(query): Query<FeatureQuery>,
) -> Json<Value> {
    let features: Vec<_> = match query.service {
        Some(service) => pricing::features_for(service).collect(),
        None => pricing::FEATURE_CATALOG.iter().collect(),
    };
    Json(json!({ "features": features }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub service_type: ServiceType,
    #[serde(default)]
    pub feature_ids: Vec<String>,
    #[serde(default)]
    pub rush: bool,
    #[serde(default)]
    pub adjustment: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub description: String,
}

pub async fn quote(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Json<QuoteResponse> {
    let quote = Quote::compute(req.service_type, &req.feature_ids, req.rush, req.adjustment);
    let description =
        pricing::describe_order(req.service_type, &req.feature_ids, req.rush, req.adjustment);
    Json(QuoteResponse { quote, description })
}
