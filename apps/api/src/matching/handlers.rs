use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::metrics::MetricComparison;
use crate::matching::scoring::{MatchResult, RankedMatches};
use crate::matching::service;
use crate::models::role::RoleProfile;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Deserialize)]
pub struct CompareRequest {
    pub role_ids: Vec<Uuid>,
}

/// GET /api/v1/people/:id/matches
pub async fn handle_rank(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<RankedMatches>, AppError> {
    let limit = params.limit.unwrap_or(state.config.default_rank_limit);
    let ranked = service::rank_catalog(&state.stores, person_id, limit, Utc::now()).await?;
    Ok(Json(ranked))
}

/// GET /api/v1/people/:id/matches/:role_id
pub async fn handle_score(
    State(state): State<AppState>,
    Path((person_id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchResult>, AppError> {
    let result = service::score_role(&state.stores, person_id, role_id, Utc::now()).await?;
    Ok(Json(result))
}

/// POST /api/v1/people/:id/matches/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<RankedMatches>, AppError> {
    let ranked = service::compare_roles(&state.stores, person_id, &req.role_ids, Utc::now()).await?;
    Ok(Json(ranked))
}

/// GET /api/v1/people/:id/matches/:role_id/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
    Path((person_id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MetricComparison>, AppError> {
    let comparison = service::metric_comparison(&state.stores, person_id, role_id, Utc::now()).await?;
    Ok(Json(comparison))
}

/// GET /api/v1/roles
pub async fn handle_search_roles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<RoleProfile>>, AppError> {
    let roles = service::search_roles(state.stores.roles.as_ref(), &params.search).await?;
    Ok(Json(roles))
}
