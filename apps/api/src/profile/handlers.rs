use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::CompetencyProfile;
use crate::profile::service::{ensure_profile, refresh_profile};
use crate::state::AppState;

/// GET /api/v1/people/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> Result<Json<CompetencyProfile>, AppError> {
    let stores = &state.stores;
    let profile = ensure_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, Utc::now()).await?;
    Ok(Json(profile))
}

/// POST /api/v1/people/:id/profile/refresh
pub async fn handle_refresh_profile(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> Result<Json<CompetencyProfile>, AppError> {
    let stores = &state.stores;
    let profile = refresh_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, Utc::now()).await?;
    Ok(Json(profile))
}
