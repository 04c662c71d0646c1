//! Static listings for clients.

use axum::Json;
use newsletter_core::{AudienceInfo, MODELS, ModelInfo, audiences};
use serde_json::{Value, json};

pub async fn list_models() -> Json<&'static [ModelInfo]> {
    Json(MODELS)
}

pub async fn list_audiences() -> Json<Vec<AudienceInfo>> {
    Json(audiences())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
