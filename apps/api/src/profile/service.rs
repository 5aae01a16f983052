//! Competency profile lifecycle: lazy creation on first use, explicit refresh.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::CompetencyProfile;
use crate::profile::extractor::{dedupe_latest, extract};
use crate::store::{CompetencyProfileStore, ProfileStore};

/// Returns the stored profile, extracting and persisting it first if the person has none.
pub async fn ensure_profile(
    raw: &dyn ProfileStore,
    profiles: &dyn CompetencyProfileStore,
    person_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CompetencyProfile, AppError> {
    let existing = profiles.get(person_id).await?;
    if !existing.is_empty() {
        return Ok(CompetencyProfile::new(person_id, existing));
    }

    let entries = dedupe_latest(extract(raw, person_id, now).await?);
    if !entries.is_empty() {
        profiles.upsert_many(&entries).await?;
        info!(
            "Created competency profile for person {person_id} with {} entries",
            entries.len()
        );
    }
    Ok(CompetencyProfile::new(person_id, entries))
}

/// Re-extracts from raw records and atomically replaces the stored profile.
pub async fn refresh_profile(
    raw: &dyn ProfileStore,
    profiles: &dyn CompetencyProfileStore,
    person_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CompetencyProfile, AppError> {
    let entries = dedupe_latest(extract(raw, person_id, now).await?);
    profiles.replace_all(person_id, &entries).await?;
    Ok(CompetencyProfile::new(person_id, entries))
}
