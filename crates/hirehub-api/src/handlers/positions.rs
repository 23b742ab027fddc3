//! Job position CRUD handlers.
//!
//! Every successful create or update follows the two-phase write: the
//! record is persisted first, then the embedding refresh runs
//! best-effort. The refresh is unconditional — a save is the recovery
//! point for a previously failed refresh — and a failure leaves the
//! position saved without a vector, excluded from matching until the
//! next successful save.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use hirehub_core::{
    CreatePositionRequest, ListPositionsRequest, PositionRepository, PositionResponse,
    UpdatePositionRequest,
};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ListPositionsQuery {
    #[serde(default)]
    pub active_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<ListPositionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let positions = state
        .db
        .positions
        .list(ListPositionsRequest {
            active_only: query.active_only,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    let responses: Vec<PositionResponse> = positions.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

pub async fn create_position(
    State(state): State<AppState>,
    Json(req): Json<CreatePositionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let id = state.db.positions.insert(req).await?;
    state.embeddings.refresh_position_or_warn(id).await;

    let position = state.db.positions.fetch(id).await?;
    Ok((StatusCode::CREATED, Json(PositionResponse::from(position))))
}

pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let position = state.db.positions.fetch(id).await?;
    Ok(Json(PositionResponse::from(position)))
}

pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePositionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.positions.update(id, req).await?;
    state.embeddings.refresh_position_or_warn(id).await;

    let position = state.db.positions.fetch(id).await?;
    Ok(Json(PositionResponse::from(position)))
}

pub async fn delete_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.positions.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
    })))
}
