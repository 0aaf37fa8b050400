use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use super::{today, ApiResult, AppState};
use crate::{Alert, MapView};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/map", get(map_view))
        .route("/alerts", get(alerts))
}

/// Markers for the map surface, colored by current status.
async fn map_view(State(state): State<AppState>) -> ApiResult<Json<MapView>> {
    // ---
    debug!("GET /map");
    let service = state.lock().await;
    Ok(Json(service.map_view(today())?))
}

/// Warnings for sensors whose soonest maintenance is in red.
async fn alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<Alert>>> {
    // ---
    debug!("GET /alerts");
    let service = state.lock().await;
    Ok(Json(service.alerts(today())?))
}
