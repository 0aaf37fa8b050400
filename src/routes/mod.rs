//! HTTP gateway for the presentation layer.
//!
//! Each sibling module exports a subrouter; this gateway merges them and
//! attaches the shared state, so the binary only ever calls [`router`].

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use chrono::NaiveDate;
use serde_json::json;
use tokio::sync::Mutex;

use crate::{MaintenanceService, ServiceError, StoreError};
use crate::store::JsonFileStore;

mod health;
mod map;
mod people;
mod sensors;

// ---

/// Shared handler state.
///
/// The mutex serializes each reload-mutate-save cycle within this process.
pub type AppState = Arc<Mutex<MaintenanceService<JsonFileStore>>>;

pub fn router(service: MaintenanceService<JsonFileStore>) -> Router {
    // ---
    Router::new()
        .merge(sensors::router())
        .merge(people::router())
        .merge(map::router())
        .merge(health::router())
        .with_state(Arc::new(Mutex::new(service)))
}

/// Current calendar day in local time.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Response wrapper turning service failures into JSON error bodies.
pub(crate) struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = match &self.0 {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::SensorNotFound(_)
            | ServiceError::PersonNotFound(_)
            | ServiceError::MaintenanceNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Store(e) => {
                tracing::error!("Store failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;
