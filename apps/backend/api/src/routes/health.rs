use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/store", get(store_health))
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct StoreHealthResponse {
    pub backend: String,
    pub rtt: u128,
}

#[tracing::instrument(name = "GET /health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[tracing::instrument(name = "GET /health/store", skip(state))]
pub async fn store_health(
    State(state): State<AppState>,
) -> Result<Json<StoreHealthResponse>, ApiError> {
    let now = Instant::now();
    state.repository.ping().await?;
    let elapsed = now.elapsed();
    Ok(Json(StoreHealthResponse {
        backend: state.store.backend_name().to_string(),
        rtt: elapsed.as_millis(),
    }))
}
