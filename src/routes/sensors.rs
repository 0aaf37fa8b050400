use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{today, ApiResult, AppState};
use crate::status;
use crate::{
    Coordinates, IndexedMaintenance, Maintenance, NewMaintenance, Sensor, SensorSummary, Status,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/sensors", get(list).post(create))
        .route("/sensors/{id}", get(show).delete(remove))
        .route("/sensors/{id}/status", get(sensor_status))
        .route(
            "/sensors/{id}/maintenances",
            get(history).post(add_maintenance),
        )
        .route(
            "/sensors/{id}/maintenances/{index}",
            delete(remove_maintenance),
        )
}

/// Body for registering a sensor at a clicked map position.
#[derive(Debug, Deserialize)]
struct NewSensor {
    name: String,
    coordinates: Coordinates,
}

#[derive(Debug, Serialize)]
struct Created {
    id: String,
}

/// Status tab: current urgency plus the latest logged maintenance.
#[derive(Debug, Serialize)]
struct SensorStatus {
    status: Option<Status>,
    next_due: Option<NaiveDate>,
    latest: Option<Maintenance>,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<SensorSummary>>> {
    let service = state.lock().await;
    Ok(Json(service.list_sensors(today())?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewSensor>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    // ---
    info!("POST /sensors - {:?} at {:?}", body.name, body.coordinates);
    let service = state.lock().await;
    let id = service.register_sensor(&body.name, body.coordinates)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Sensor>> {
    let service = state.lock().await;
    Ok(Json(service.get_sensor(&id)?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    // ---
    info!("DELETE /sensors/{}", id);
    let service = state.lock().await;
    service.delete_sensor(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn sensor_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SensorStatus>> {
    // ---
    debug!("GET /sensors/{}/status", id);
    let service = state.lock().await;
    let sensor = service.get_sensor(&id)?;
    let latest = service.latest_maintenance(&id)?;
    Ok(Json(SensorStatus {
        status: status::sensor_status(&sensor, today()),
        next_due: status::soonest_due(&sensor),
        latest,
    }))
}

async fn history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<IndexedMaintenance>>> {
    let service = state.lock().await;
    Ok(Json(service.maintenance_history(&id)?))
}

async fn add_maintenance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NewMaintenance>,
) -> ApiResult<(StatusCode, Json<Maintenance>)> {
    // ---
    info!("POST /sensors/{}/maintenances", id);
    let service = state.lock().await;
    let record = service.add_maintenance(&id, body, today())?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn remove_maintenance(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<StatusCode> {
    // ---
    info!("DELETE /sensors/{}/maintenances/{}", id, index);
    let service = state.lock().await;
    service.remove_maintenance(&id, index)?;
    Ok(StatusCode::NO_CONTENT)
}
