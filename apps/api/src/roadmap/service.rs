//! Roadmap lifecycle: generate (superseding the active plan), read, update, delete.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::service::load_role;
use crate::models::roadmap::{CareerRoadmap, RoadmapUpdate};
use crate::profile::service::ensure_profile;
use crate::roadmap::builder::{RoadmapBuilder, RoadmapRequest};
use crate::store::Stores;

/// Longest custom goal kept, in characters.
const MAX_GOAL_CHARS: usize = 200;
const MAX_GOALS: usize = 10;

/// Builds a roadmap for the role and makes it the person's only ACTIVE one.
pub async fn generate_roadmap(
    stores: &Stores,
    builder: &RoadmapBuilder,
    person_id: Uuid,
    role_id: Uuid,
    custom_goals: Vec<String>,
    now: DateTime<Utc>,
) -> Result<CareerRoadmap, AppError> {
    let custom_goals = clean_goals(custom_goals)?;
    let role = load_role(stores.roles.as_ref(), role_id).await?;
    let profile = ensure_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, now).await?;
    let person_name = stores
        .people
        .get_raw_records(person_id)
        .await?
        .and_then(|r| r.display_name);

    let roadmap = builder
        .build(RoadmapRequest {
            person_id,
            person_name: person_name.as_deref(),
            profile: &profile,
            role: &role,
            custom_goals,
            now,
        })
        .await;

    let archived = stores.roadmaps.supersede_active(&roadmap).await?;
    info!(
        "Created roadmap {} for person {person_id} targeting {} ({} steps, archived {archived})",
        roadmap.id,
        role.name,
        roadmap.steps.len()
    );
    Ok(roadmap)
}

pub async fn active_roadmap(stores: &Stores, person_id: Uuid) -> Result<CareerRoadmap, AppError> {
    stores
        .roadmaps
        .get_active(person_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No active roadmap for person {person_id}")))
}

pub async fn update_roadmap(
    stores: &Stores,
    id: Uuid,
    update: RoadmapUpdate,
    now: DateTime<Utc>,
) -> Result<CareerRoadmap, AppError> {
    let roadmap = stores.roadmaps.update(id, update, now).await?;
    info!(
        "Updated roadmap {id}: status={:?}, progress={}%",
        roadmap.status, roadmap.progress_percent
    );
    Ok(roadmap)
}

pub async fn delete_roadmap(stores: &Stores, id: Uuid) -> Result<(), AppError> {
    if !stores.roadmaps.delete(id).await? {
        return Err(AppError::NotFound(format!("Roadmap {id} not found")));
    }
    info!("Deleted roadmap {id}");
    Ok(())
}

/// Trims goals and drops blanks. Too many or overlong goals are rejected.
fn clean_goals(goals: Vec<String>) -> Result<Vec<String>, AppError> {
    let goals: Vec<String> = goals
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    if goals.len() > MAX_GOALS {
        return Err(AppError::Validation(format!(
            "at most {MAX_GOALS} custom goals are allowed"
        )));
    }
    if goals.iter().any(|g| g.chars().count() > MAX_GOAL_CHARS) {
        return Err(AppError::Validation(format!(
            "custom goals must be at most {MAX_GOAL_CHARS} characters"
        )));
    }
    Ok(goals)
}
