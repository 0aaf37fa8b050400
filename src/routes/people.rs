use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{ApiResult, AppState};
use crate::People;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/people", get(list).post(create))
        .route("/people/{name}", delete(remove))
}

#[derive(Debug, Deserialize)]
struct NewPerson {
    name: String,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<People>> {
    let service = state.lock().await;
    Ok(Json(service.list_people()?))
}

/// Register a person and return the updated list.
async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewPerson>,
) -> ApiResult<(StatusCode, Json<People>)> {
    // ---
    info!("POST /people - {:?}", body.name);
    let service = state.lock().await;
    service.add_person(&body.name)?;
    Ok((StatusCode::CREATED, Json(service.list_people()?)))
}

async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    // ---
    info!("DELETE /people/{}", name);
    let service = state.lock().await;
    service.remove_person(&name)?;
    Ok(StatusCode::NO_CONTENT)
}
