//! Liveness probe

use axum::Json;
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "Physical AI Textbook API";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
