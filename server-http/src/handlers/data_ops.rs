use crate::models::{RetrieveResponse, StoreRequest, StoreResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

/// GET /data/{id}
pub async fn retrieve_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RetrieveResponse>, StatusCode> {
    info!("GET: id={}", id);

    match state.service.get(id).await {
        Some(payload) => Ok(Json(RetrieveResponse { id, payload })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// POST /data
pub async fn create_data(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), StatusCode> {
    let id = req.id.unwrap_or_else(Uuid::new_v4);
    info!("POST: id={}", id);

    match state.service.put(id, &req.payload).await {
        Ok(()) => Ok((StatusCode::CREATED, Json(StoreResponse { id }))),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /data/{id}
pub async fn update_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StoreRequest>,
) -> Result<StatusCode, StatusCode> {
    info!("PUT: id={}", id);

    match state.service.put(id, &req.payload).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
