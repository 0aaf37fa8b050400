// src/routes/health.rs
//! Health check endpoint.
//!
//! Unlike a bare liveness probe, `/health` reads both data files so a corrupt
//! or unreadable store shows up here before a user trips over it.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::{ApiResult, AppState};
use crate::store::Store;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    sensors: usize,
    people: usize,
}

/// Handle `GET /health`.
///
/// Returns 500 with the store error if either collection fails to load.
async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    // ---
    let service = state.lock().await;
    let store = service.store();
    Ok(Json(HealthResponse {
        status: "ok",
        sensors: store.load_sensors()?.len(),
        people: store.load_people()?.len(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
