//! Matching operations over stored profiles and the role catalog.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::metrics::{compare_metrics, MetricComparison};
use crate::matching::scoring::{overall_compatibility, rank, score, MatchResult, RankedMatches};
use crate::models::competency::CompetencyProfile;
use crate::models::role::RoleProfile;
use crate::profile::service::ensure_profile;
use crate::store::{RoleCatalog, Stores};

/// Loads one role, rejecting unknown ids and unusable definitions.
pub async fn load_role(catalog: &dyn RoleCatalog, role_id: Uuid) -> Result<RoleProfile, AppError> {
    let role = catalog
        .get_by_id(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {role_id} not found")))?;
    role.validate()?;
    Ok(role)
}

pub async fn score_role(
    stores: &Stores,
    person_id: Uuid,
    role_id: Uuid,
    now: DateTime<Utc>,
) -> Result<MatchResult, AppError> {
    let role = load_role(stores.roles.as_ref(), role_id).await?;
    let profile = ensure_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, now).await?;
    Ok(score(&profile, &role))
}

/// Ranks the whole catalog. Roles with invalid definitions are skipped.
pub async fn rank_catalog(
    stores: &Stores,
    person_id: Uuid,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<RankedMatches, AppError> {
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }
    let profile = ensure_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, now).await?;
    let roles: Vec<RoleProfile> = stores
        .roles
        .all()
        .await?
        .into_iter()
        .filter(|r| match r.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping role {} during ranking: {e}", r.id);
                false
            }
        })
        .collect();

    let ranked = rank_blocking(profile, roles, limit).await?;
    info!(
        "Ranked catalog for person {person_id}: {} matches, overall {:.1}",
        ranked.matches.len(),
        ranked.overall_compatibility
    );
    Ok(ranked)
}

/// Ranks only the listed roles. Every id must exist.
pub async fn compare_roles(
    stores: &Stores,
    person_id: Uuid,
    role_ids: &[Uuid],
    now: DateTime<Utc>,
) -> Result<RankedMatches, AppError> {
    if role_ids.is_empty() {
        return Err(AppError::Validation("role_ids cannot be empty".to_string()));
    }
    let mut seen = HashSet::new();
    let mut roles = Vec::with_capacity(role_ids.len());
    for id in role_ids {
        if seen.insert(*id) {
            roles.push(load_role(stores.roles.as_ref(), *id).await?);
        }
    }
    let profile = ensure_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, now).await?;
    let limit = roles.len();
    rank_blocking(profile, roles, limit).await
}

pub async fn metric_comparison(
    stores: &Stores,
    person_id: Uuid,
    role_id: Uuid,
    now: DateTime<Utc>,
) -> Result<MetricComparison, AppError> {
    let role = load_role(stores.roles.as_ref(), role_id).await?;
    let profile = ensure_profile(stores.people.as_ref(), stores.profiles.as_ref(), person_id, now).await?;
    Ok(compare_metrics(&profile, &role))
}

pub async fn search_roles(catalog: &dyn RoleCatalog, term: &str) -> Result<Vec<RoleProfile>, AppError> {
    if term.trim().is_empty() {
        return catalog.all().await;
    }
    catalog.search(term).await
}

/// Scoring is CPU-bound, so the map-then-sort runs off the async executor.
/// `rank` sorts the complete result set before truncating.
async fn rank_blocking(
    profile: CompetencyProfile,
    roles: Vec<RoleProfile>,
    limit: usize,
) -> Result<RankedMatches, AppError> {
    tokio::task::spawn_blocking(move || {
        let matches = rank(&profile, &roles, limit);
        let overall_compatibility = overall_compatibility(&matches);
        RankedMatches {
            matches,
            overall_compatibility,
        }
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Ranking task failed: {e}")))
}
