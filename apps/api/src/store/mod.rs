//! Storage seams for the engine.
//!
//! Each collaborator is a trait carried in `AppState` as `Arc<dyn …>`.
//! `postgres` holds the production implementations; `memory` backs the tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::CompetencyEntry;
use crate::models::raw::RawDomainRecords;
use crate::models::roadmap::{CareerRoadmap, RoadmapUpdate};
use crate::models::role::RoleProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// The full set of store handles the engine's operations need.
#[derive(Clone)]
pub struct Stores {
    pub people: Arc<dyn ProfileStore>,
    pub roles: Arc<dyn RoleCatalog>,
    pub profiles: Arc<dyn CompetencyProfileStore>,
    pub roadmaps: Arc<dyn RoadmapStore>,
}

impl Stores {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self {
            people: store.clone(),
            roles: store.clone(),
            profiles: store.clone(),
            roadmaps: store,
        }
    }

    #[cfg(test)]
    pub fn memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            people: store.clone(),
            roles: store.clone(),
            profiles: store.clone(),
            roadmaps: store,
        }
    }
}

/// Read-only source of a person's raw profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `None` when the person is unknown.
    async fn get_raw_records(&self, person_id: Uuid) -> Result<Option<RawDomainRecords>, AppError>;
}

#[async_trait]
pub trait RoleCatalog: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<RoleProfile>, AppError>;
    /// All roles, ordered by name.
    async fn all(&self) -> Result<Vec<RoleProfile>, AppError>;
    /// Case-insensitive match on name or category.
    async fn search(&self, term: &str) -> Result<Vec<RoleProfile>, AppError>;
}

#[async_trait]
pub trait CompetencyProfileStore: Send + Sync {
    async fn get(&self, person_id: Uuid) -> Result<Vec<CompetencyEntry>, AppError>;
    /// Inserts or replaces by `(person_id, competency_id)`.
    async fn upsert_many(&self, entries: &[CompetencyEntry]) -> Result<(), AppError>;
    async fn delete_all(&self, person_id: Uuid) -> Result<u64, AppError>;
    /// Atomic delete-all-then-insert. Readers see the old or the new profile, never a mix.
    async fn replace_all(&self, person_id: Uuid, entries: &[CompetencyEntry]) -> Result<(), AppError>;
}

#[async_trait]
pub trait RoadmapStore: Send + Sync {
    async fn create(&self, roadmap: &CareerRoadmap) -> Result<(), AppError>;
    /// Archives every ACTIVE roadmap for the person; returns how many changed.
    async fn archive_active(&self, person_id: Uuid) -> Result<u64, AppError>;
    /// Atomic `archive_active` + `create`. Keeps at most one ACTIVE roadmap per person.
    async fn supersede_active(&self, roadmap: &CareerRoadmap) -> Result<u64, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<CareerRoadmap>, AppError>;
    async fn get_active(&self, person_id: Uuid) -> Result<Option<CareerRoadmap>, AppError>;
    /// Read-modify-write of one roadmap under `CareerRoadmap::apply_update` rules.
    /// Unknown id → `NotFound`.
    async fn update(
        &self,
        id: Uuid,
        update: RoadmapUpdate,
        now: DateTime<Utc>,
    ) -> Result<CareerRoadmap, AppError>;
    /// Returns `false` when no roadmap had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
