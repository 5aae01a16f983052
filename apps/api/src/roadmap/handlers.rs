use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::{CareerRoadmap, RoadmapUpdate};
use crate::roadmap::service;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateRoadmapRequest {
    pub role_id: Uuid,
    #[serde(default)]
    pub custom_goals: Vec<String>,
}

/// POST /api/v1/people/:id/roadmaps
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Json(req): Json<GenerateRoadmapRequest>,
) -> Result<(StatusCode, Json<CareerRoadmap>), AppError> {
    let roadmap = service::generate_roadmap(
        &state.stores,
        &state.roadmap_builder,
        person_id,
        req.role_id,
        req.custom_goals,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(roadmap)))
}

/// GET /api/v1/people/:id/roadmaps/active
pub async fn handle_get_active(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> Result<Json<CareerRoadmap>, AppError> {
    Ok(Json(service::active_roadmap(&state.stores, person_id).await?))
}

/// PATCH /api/v1/roadmaps/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<RoadmapUpdate>,
) -> Result<Json<CareerRoadmap>, AppError> {
    let roadmap = service::update_roadmap(&state.stores, id, update, Utc::now()).await?;
    Ok(Json(roadmap))
}

/// DELETE /api/v1/roadmaps/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_roadmap(&state.stores, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
