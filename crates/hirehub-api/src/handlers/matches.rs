//! AI matching endpoint and the administrative re-embed pass.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use hirehub_core::defaults;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    /// Maximum number of candidates. Defaults to
    /// [`defaults::DEFAULT_TOP_N`], capped at [`defaults::MAX_TOP_N`].
    pub top_n: Option<i64>,
    /// Request an LLM fit assessment per candidate. Off by default:
    /// narration costs one remote round-trip per candidate.
    #[serde(default)]
    pub narrate: bool,
}

/// Effective `top_n` for a request. Non-positive values pass through so
/// the service rejects them as invalid input; the cap only bounds how
/// much narration work one request can demand.
fn effective_top_n(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(defaults::DEFAULT_TOP_N)
        .min(defaults::MAX_TOP_N)
}

pub async fn get_position_matches(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MatchesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let top_n = effective_top_n(query.top_n);
    let results = state
        .matches
        .rank_with_narratives(id, top_n, query.narrate)
        .await?;
    Ok(Json(results))
}

/// Re-embed every stored position and applicant.
///
/// For model migration: run after changing the embedding model, since
/// vectors from different models are not comparable.
pub async fn re_embed_all(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.embeddings.re_embed_all().await?;
    Ok(Json(serde_json::json!({
        "positions_embedded": report.positions_embedded,
        "applicants_embedded": report.applicants_embedded,
        "skipped": report.skipped,
        "failed": report.failed,
    })))
}
