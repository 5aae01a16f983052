//! In-memory implementations of the store seams, used by unit and router tests.
//! Each store keeps its state behind one mutex so compound operations are atomic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::CompetencyEntry;
use crate::models::raw::RawDomainRecords;
use crate::models::roadmap::{CareerRoadmap, RoadmapStatus, RoadmapUpdate};
use crate::models::role::RoleProfile;
use crate::store::{CompetencyProfileStore, ProfileStore, RoadmapStore, RoleCatalog};

#[derive(Default)]
pub struct MemoryStore {
    people: Mutex<HashMap<Uuid, RawDomainRecords>>,
    roles: Mutex<Vec<RoleProfile>>,
    profiles: Mutex<HashMap<Uuid, Vec<CompetencyEntry>>>,
    roadmaps: Mutex<Vec<CareerRoadmap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&self, records: RawDomainRecords) {
        self.people.lock().unwrap().insert(records.person_id, records);
    }

    pub fn add_role(&self, role: RoleProfile) {
        self.roles.lock().unwrap().push(role);
    }

    pub fn roadmaps_for(&self, person_id: Uuid) -> Vec<CareerRoadmap> {
        self.roadmaps
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.person_id == person_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_raw_records(&self, person_id: Uuid) -> Result<Option<RawDomainRecords>, AppError> {
        Ok(self.people.lock().unwrap().get(&person_id).cloned())
    }
}

#[async_trait]
impl RoleCatalog for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<RoleProfile>, AppError> {
        Ok(self.roles.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn all(&self) -> Result<Vec<RoleProfile>, AppError> {
        let mut roles = self.roles.lock().unwrap().clone();
        roles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(roles)
    }

    async fn search(&self, term: &str) -> Result<Vec<RoleProfile>, AppError> {
        let term = term.trim().to_lowercase();
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&term) || r.category.to_lowercase().contains(&term))
            .collect())
    }
}

#[async_trait]
impl CompetencyProfileStore for MemoryStore {
    async fn get(&self, person_id: Uuid) -> Result<Vec<CompetencyEntry>, AppError> {
        let mut entries = self
            .profiles
            .lock()
            .unwrap()
            .get(&person_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|a, b| a.competency_id.cmp(&b.competency_id));
        Ok(entries)
    }

    async fn upsert_many(&self, entries: &[CompetencyEntry]) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        for entry in entries {
            let slot = profiles.entry(entry.person_id).or_default();
            match slot.iter_mut().find(|e| e.competency_id == entry.competency_id) {
                Some(existing) => *existing = entry.clone(),
                None => slot.push(entry.clone()),
            }
        }
        Ok(())
    }

    async fn delete_all(&self, person_id: Uuid) -> Result<u64, AppError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .remove(&person_id)
            .map(|v| v.len() as u64)
            .unwrap_or(0))
    }

    async fn replace_all(&self, person_id: Uuid, entries: &[CompetencyEntry]) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        let mut fresh: Vec<CompetencyEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match fresh.iter_mut().find(|e| e.competency_id == entry.competency_id) {
                Some(existing) => *existing = entry.clone(),
                None => fresh.push(entry.clone()),
            }
        }
        profiles.insert(person_id, fresh);
        Ok(())
    }
}

#[async_trait]
impl RoadmapStore for MemoryStore {
    async fn create(&self, roadmap: &CareerRoadmap) -> Result<(), AppError> {
        let mut roadmaps = self.roadmaps.lock().unwrap();
        if roadmap.status == RoadmapStatus::Active
            && roadmaps
                .iter()
                .any(|r| r.person_id == roadmap.person_id && r.status == RoadmapStatus::Active)
        {
            return Err(AppError::Conflict(format!(
                "person {} already has an active roadmap",
                roadmap.person_id
            )));
        }
        roadmaps.push(roadmap.clone());
        Ok(())
    }

    async fn archive_active(&self, person_id: Uuid) -> Result<u64, AppError> {
        Ok(archive_locked(&mut self.roadmaps.lock().unwrap(), person_id))
    }

    async fn supersede_active(&self, roadmap: &CareerRoadmap) -> Result<u64, AppError> {
        let mut roadmaps = self.roadmaps.lock().unwrap();
        let archived = archive_locked(&mut roadmaps, roadmap.person_id);
        roadmaps.push(roadmap.clone());
        Ok(archived)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CareerRoadmap>, AppError> {
        Ok(self.roadmaps.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn get_active(&self, person_id: Uuid) -> Result<Option<CareerRoadmap>, AppError> {
        Ok(self
            .roadmaps
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.person_id == person_id && r.status == RoadmapStatus::Active)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        update: RoadmapUpdate,
        now: DateTime<Utc>,
    ) -> Result<CareerRoadmap, AppError> {
        let mut roadmaps = self.roadmaps.lock().unwrap();
        let roadmap = roadmaps
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Roadmap {id} not found")))?;
        let mut next = roadmap.clone();
        next.apply_update(update, now)?;
        *roadmap = next.clone();
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut roadmaps = self.roadmaps.lock().unwrap();
        let before = roadmaps.len();
        roadmaps.retain(|r| r.id != id);
        Ok(roadmaps.len() != before)
    }
}

fn archive_locked(roadmaps: &mut [CareerRoadmap], person_id: Uuid) -> u64 {
    let now = Utc::now();
    let mut archived = 0;
    for r in roadmaps
        .iter_mut()
        .filter(|r| r.person_id == person_id && r.status == RoadmapStatus::Active)
    {
        r.status = RoadmapStatus::Archived;
        r.updated_at = now;
        archived += 1;
    }
    archived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::test_support::profile;

    fn roadmap(person_id: Uuid, status: RoadmapStatus) -> CareerRoadmap {
        let now = Utc::now();
        CareerRoadmap {
            id: Uuid::new_v4(),
            person_id,
            target_role_id: Uuid::new_v4(),
            current_match_score: 50.0,
            projected_match_score: 60.0,
            estimated_completion_time: "3–6 months".to_string(),
            steps: Vec::new(),
            recommendations: vec!["Practise".to_string()],
            motivational_notes: Vec::new(),
            custom_goals: Vec::new(),
            status,
            progress_percent: 0,
            completed_competencies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_second_active_roadmap() {
        let store = MemoryStore::new();
        let person = Uuid::new_v4();
        store.create(&roadmap(person, RoadmapStatus::Active)).await.unwrap();

        let err = store
            .create(&roadmap(person, RoadmapStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Non-active roadmaps and other people are unaffected.
        store.create(&roadmap(person, RoadmapStatus::Completed)).await.unwrap();
        store.create(&roadmap(Uuid::new_v4(), RoadmapStatus::Active)).await.unwrap();
        assert_eq!(store.roadmaps_for(person).len(), 2);
    }

    #[tokio::test]
    async fn test_archive_active_counts_and_frees_the_slot() {
        let store = MemoryStore::new();
        let person = Uuid::new_v4();
        let first = roadmap(person, RoadmapStatus::Active);
        store.create(&first).await.unwrap();

        assert_eq!(store.archive_active(person).await.unwrap(), 1);
        assert_eq!(store.archive_active(person).await.unwrap(), 0);
        assert!(store.get_active(person).await.unwrap().is_none());
        let archived = RoadmapStore::get(&store, first.id).await.unwrap().unwrap();
        assert_eq!(archived.status, RoadmapStatus::Archived);

        let second = roadmap(person, RoadmapStatus::Active);
        store.create(&second).await.unwrap();
        assert_eq!(store.get_active(person).await.unwrap().map(|r| r.id), Some(second.id));
    }

    #[tokio::test]
    async fn test_supersede_keeps_one_active() {
        let store = MemoryStore::new();
        let person = Uuid::new_v4();
        store.create(&roadmap(person, RoadmapStatus::Active)).await.unwrap();

        let next = roadmap(person, RoadmapStatus::Active);
        assert_eq!(store.supersede_active(&next).await.unwrap(), 1);
        let active: Vec<_> = store
            .roadmaps_for(person)
            .into_iter()
            .filter(|r| r.status == RoadmapStatus::Active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, next.id);
    }

    #[tokio::test]
    async fn test_delete_all_reports_removed_entries() {
        let store = MemoryStore::new();
        let p = profile(&[("programming", 4), ("teamwork", 6)]);
        store.upsert_many(&p.entries).await.unwrap();

        assert_eq!(store.delete_all(p.person_id).await.unwrap(), 2);
        assert_eq!(store.delete_all(p.person_id).await.unwrap(), 0);
        assert!(CompetencyProfileStore::get(&store, p.person_id).await.unwrap().is_empty());
    }
}
