//! Applicant pipeline CRUD handlers.
//!
//! Every successful create or update triggers a best-effort embedding
//! refresh, regardless of which fields changed — a save is the recovery
//! point for a previously failed refresh, so no change detection is
//! applied here. The empty-resume guard lives in the refresh itself and
//! leaves a previously stored vector in place.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use hirehub_core::{
    ApplicantRepository, ApplicantResponse, CreateApplicantRequest, ListApplicantsRequest, Source,
    Stage, UpdateApplicantRequest,
};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ListApplicantsQuery {
    /// Case-insensitive substring search over name, email, and tags.
    pub search: Option<String>,
    pub stage: Option<Stage>,
    pub source: Option<Source>,
    pub position_id: Option<Uuid>,
    /// "created_at", "-created_at", "name", "-name", "updated_at",
    /// "-updated_at". Default "-created_at".
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_applicants(
    State(state): State<AppState>,
    Query(query): Query<ListApplicantsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let applicants = state
        .db
        .applicants
        .list(ListApplicantsRequest {
            search: query.search,
            stage: query.stage,
            source: query.source,
            position_id: query.position_id,
            ordering: query.ordering,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    let responses: Vec<ApplicantResponse> = applicants.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

pub async fn create_applicant(
    State(state): State<AppState>,
    Json(req): Json<CreateApplicantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email must not be empty".to_string()));
    }

    let id = state.db.applicants.insert(req).await?;
    state.embeddings.refresh_applicant_or_warn(id).await;

    let applicant = state.db.applicants.fetch(id).await?;
    Ok((StatusCode::CREATED, Json(ApplicantResponse::from(applicant))))
}

pub async fn get_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let applicant = state.db.applicants.fetch(id).await?;
    Ok(Json(ApplicantResponse::from(applicant)))
}

pub async fn update_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.applicants.update(id, req).await?;
    state.embeddings.refresh_applicant_or_warn(id).await;

    let applicant = state.db.applicants.fetch(id).await?;
    Ok(Json(ApplicantResponse::from(applicant)))
}

pub async fn delete_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.applicants.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
    })))
}
