use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::{CompetencyEntry, CompetencyEntryRow};
use crate::models::raw::{
    AcademicRecord, ActivityRecord, InterestProfile, PersonRow, RawDomainRecords,
    SocialEmotionalRating,
};
use crate::models::roadmap::{CareerRoadmap, CareerRoadmapRow, RoadmapStatus, RoadmapUpdate};
use crate::models::role::{RoleProfile, RoleRequirement, RoleRequirementRow, RoleRow};
use crate::store::{CompetencyProfileStore, ProfileStore, RoadmapStore, RoleCatalog};

/// PostgreSQL implementation of every store seam.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_requirements(&self, roles: Vec<RoleRow>) -> Result<Vec<RoleProfile>, AppError> {
        if roles.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        let rows = sqlx::query_as::<_, RoleRequirementRow>(
            r#"
            SELECT role_id, competency_id, minimum_level, importance, weight
            FROM role_requirements
            WHERE role_id = ANY($1)
            ORDER BY role_id, competency_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_role: HashMap<Uuid, Vec<RoleRequirement>> = HashMap::new();
        for row in rows {
            let role_id = row.role_id;
            by_role
                .entry(role_id)
                .or_default()
                .push(RoleRequirement::try_from(row)?);
        }

        Ok(roles
            .into_iter()
            .map(|r| RoleProfile {
                requirements: by_role.remove(&r.id).unwrap_or_default(),
                id: r.id,
                name: r.name,
                category: r.category,
            })
            .collect())
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_raw_records(&self, person_id: Uuid) -> Result<Option<RawDomainRecords>, AppError> {
        let person: Option<PersonRow> =
            sqlx::query_as("SELECT id, display_name FROM people WHERE id = $1")
                .bind(person_id)
                .fetch_optional(&self.pool)
                .await?;
        let Some(person) = person else {
            return Ok(None);
        };

        let academic = sqlx::query_as::<_, AcademicRecord>(
            "SELECT subject, score, scale_max, recorded_at FROM academic_records \
             WHERE person_id = $1 ORDER BY recorded_at",
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        let social_emotional = sqlx::query_as::<_, SocialEmotionalRating>(
            "SELECT dimension, rating, recorded_at FROM social_emotional_ratings \
             WHERE person_id = $1 ORDER BY recorded_at",
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        let interests = sqlx::query_as::<_, InterestProfile>(
            "SELECT interests, talents, recorded_at FROM interest_profiles WHERE person_id = $1",
        )
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?;

        let activities = sqlx::query_as::<_, ActivityRecord>(
            "SELECT name, role, recorded_at FROM activity_records \
             WHERE person_id = $1 ORDER BY recorded_at",
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RawDomainRecords {
            person_id: person.id,
            display_name: person.display_name,
            academic,
            social_emotional,
            interests,
            activities,
        }))
    }
}

#[async_trait]
impl RoleCatalog for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<RoleProfile>, AppError> {
        let role: Option<RoleRow> = sqlx::query_as("SELECT id, name, category FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match role {
            Some(role) => Ok(self.load_requirements(vec![role]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<RoleProfile>, AppError> {
        let roles = sqlx::query_as::<_, RoleRow>("SELECT id, name, category FROM roles ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        self.load_requirements(roles).await
    }

    async fn search(&self, term: &str) -> Result<Vec<RoleProfile>, AppError> {
        let pattern = format!("%{}%", escape_like(term.trim()));
        let roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, category FROM roles
            WHERE name ILIKE $1 ESCAPE '\' OR category ILIKE $1 ESCAPE '\'
            ORDER BY name, id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        self.load_requirements(roles).await
    }
}

async fn upsert_entry<'e, E: PgExecutor<'e>>(
    executor: E,
    entry: &CompetencyEntry,
) -> Result<(), AppError> {
    let provenance = serde_json::to_value(&entry.provenance)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize provenance: {e}")))?;
    sqlx::query(
        r#"
        INSERT INTO competency_profiles (person_id, competency_id, current_level, assessed_at, provenance)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (person_id, competency_id) DO UPDATE
        SET current_level = EXCLUDED.current_level,
            assessed_at = EXCLUDED.assessed_at,
            provenance = EXCLUDED.provenance
        "#,
    )
    .bind(entry.person_id)
    .bind(&entry.competency_id)
    .bind(entry.current_level.value() as i16)
    .bind(entry.assessed_at)
    .bind(provenance)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl CompetencyProfileStore for PgStore {
    async fn get(&self, person_id: Uuid) -> Result<Vec<CompetencyEntry>, AppError> {
        let rows = sqlx::query_as::<_, CompetencyEntryRow>(
            r#"
            SELECT person_id, competency_id, current_level, assessed_at, provenance
            FROM competency_profiles
            WHERE person_id = $1
            ORDER BY competency_id
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(CompetencyEntry::try_from).collect()
    }

    async fn upsert_many(&self, entries: &[CompetencyEntry]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            upsert_entry(&mut *tx, entry).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_all(&self, person_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM competency_profiles WHERE person_id = $1")
            .bind(person_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn replace_all(&self, person_id: Uuid, entries: &[CompetencyEntry]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM competency_profiles WHERE person_id = $1")
            .bind(person_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        for entry in entries {
            upsert_entry(&mut *tx, entry).await?;
        }
        tx.commit().await?;
        info!(
            "Replaced competency profile for person {person_id}: {deleted} removed, {} written",
            entries.len()
        );
        Ok(())
    }
}

async fn insert_roadmap<'e, E: PgExecutor<'e>>(
    executor: E,
    roadmap: &CareerRoadmap,
) -> Result<(), AppError> {
    let steps = serde_json::to_value(&roadmap.steps)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize steps: {e}")))?;
    sqlx::query(
        r#"
        INSERT INTO career_roadmaps
            (id, person_id, target_role_id, current_match_score, projected_match_score,
             estimated_completion_time, steps, recommendations, motivational_notes,
             custom_goals, status, progress_percent, completed_competencies, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(roadmap.id)
    .bind(roadmap.person_id)
    .bind(roadmap.target_role_id)
    .bind(roadmap.current_match_score)
    .bind(roadmap.projected_match_score)
    .bind(&roadmap.estimated_completion_time)
    .bind(steps)
    .bind(&roadmap.recommendations)
    .bind(&roadmap.motivational_notes)
    .bind(&roadmap.custom_goals)
    .bind(roadmap.status.as_str())
    .bind(roadmap.progress_percent as i16)
    .bind(&roadmap.completed_competencies)
    .bind(roadmap.created_at)
    .bind(roadmap.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn archive_active_for<'e, E: PgExecutor<'e>>(executor: E, person_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE career_roadmaps SET status = 'archived', updated_at = now() \
         WHERE person_id = $1 AND status = 'active'",
    )
    .bind(person_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl RoadmapStore for PgStore {
    async fn create(&self, roadmap: &CareerRoadmap) -> Result<(), AppError> {
        insert_roadmap(&self.pool, roadmap).await
    }

    async fn archive_active(&self, person_id: Uuid) -> Result<u64, AppError> {
        archive_active_for(&self.pool, person_id).await
    }

    async fn supersede_active(&self, roadmap: &CareerRoadmap) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        // Serializes concurrent generations for the same person.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(roadmap.person_id)
            .execute(&mut *tx)
            .await?;
        let archived = archive_active_for(&mut *tx, roadmap.person_id).await?;
        insert_roadmap(&mut *tx, roadmap).await?;
        tx.commit().await?;
        info!(
            "Roadmap {} is now active for person {} ({archived} archived)",
            roadmap.id, roadmap.person_id
        );
        Ok(archived)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CareerRoadmap>, AppError> {
        let row: Option<CareerRoadmapRow> = sqlx::query_as("SELECT * FROM career_roadmaps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(CareerRoadmap::try_from).transpose()
    }

    async fn get_active(&self, person_id: Uuid) -> Result<Option<CareerRoadmap>, AppError> {
        let row: Option<CareerRoadmapRow> = sqlx::query_as(
            "SELECT * FROM career_roadmaps WHERE person_id = $1 AND status = $2 LIMIT 1",
        )
        .bind(person_id)
        .bind(RoadmapStatus::Active.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(CareerRoadmap::try_from).transpose()
    }

    async fn update(
        &self,
        id: Uuid,
        update: RoadmapUpdate,
        now: DateTime<Utc>,
    ) -> Result<CareerRoadmap, AppError> {
        let mut tx = self.pool.begin().await?;
        let row: Option<CareerRoadmapRow> =
            sqlx::query_as("SELECT * FROM career_roadmaps WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let mut roadmap = row
            .map(CareerRoadmap::try_from)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Roadmap {id} not found")))?;

        roadmap.apply_update(update, now)?;

        sqlx::query(
            r#"
            UPDATE career_roadmaps
            SET status = $2, progress_percent = $3, completed_competencies = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(roadmap.status.as_str())
        .bind(roadmap.progress_percent as i16)
        .bind(&roadmap.completed_competencies)
        .bind(roadmap.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(roadmap)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM career_roadmaps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escapes `%`, `_` and `\` so a search term matches literally inside ILIKE.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
