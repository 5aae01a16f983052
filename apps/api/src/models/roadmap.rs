use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role::Importance;

/// `Active → Archived` (superseded) and `Active → Completed` (explicit).
/// Both non-active states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoadmapStatus {
    Active,
    Completed,
    Archived,
}

impl RoadmapStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RoadmapStatus::Active => "active",
            RoadmapStatus::Completed => "completed",
            RoadmapStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(RoadmapStatus::Active),
            "completed" => Some(RoadmapStatus::Completed),
            "archived" => Some(RoadmapStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Course,
    Book,
    Practice,
    Community,
    Mentorship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub kind: ResourceKind,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub description: String,
    pub target_date: NaiveDate,
    pub success_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentStep {
    pub competency_id: String,
    pub current_level: u8,
    pub target_level: u8,
    pub priority: Importance,
    pub timeline: String,
    pub strategies: Vec<String>,
    pub resources: Vec<Resource>,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRoadmap {
    pub id: Uuid,
    pub person_id: Uuid,
    pub target_role_id: Uuid,
    pub current_match_score: f64,
    pub projected_match_score: f64,
    pub estimated_completion_time: String,
    pub steps: Vec<DevelopmentStep>,
    pub recommendations: Vec<String>,
    pub motivational_notes: Vec<String>,
    pub custom_goals: Vec<String>,
    pub status: RoadmapStatus,
    pub progress_percent: u8,
    pub completed_competencies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for progress tracking. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadmapUpdate {
    pub status: Option<RoadmapStatus>,
    pub progress_percent: Option<u8>,
    pub completed_competencies: Option<Vec<String>>,
}

impl CareerRoadmap {
    /// Applies a partial update in place, enforcing the status state machine.
    pub fn apply_update(&mut self, update: RoadmapUpdate, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.status != RoadmapStatus::Active {
            return Err(AppError::Conflict(format!(
                "roadmap {} is {:?} and can no longer be updated",
                self.id, self.status
            )));
        }
        if let Some(p) = update.progress_percent {
            if p > 100 {
                return Err(AppError::Validation(format!(
                    "progress_percent must be 0..=100, got {p}"
                )));
            }
        }
        match update.status {
            None | Some(RoadmapStatus::Active) => {}
            Some(RoadmapStatus::Completed) => self.status = RoadmapStatus::Completed,
            Some(RoadmapStatus::Archived) => {
                return Err(AppError::Conflict(
                    "roadmaps are archived only when superseded by a newer roadmap".to_string(),
                ))
            }
        }
        if let Some(p) = update.progress_percent {
            self.progress_percent = p;
        }
        if let Some(done) = update.completed_competencies {
            self.completed_competencies = done;
        }
        if self.status == RoadmapStatus::Completed {
            self.progress_percent = 100;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CareerRoadmapRow {
    pub id: Uuid,
    pub person_id: Uuid,
    pub target_role_id: Uuid,
    pub current_match_score: f64,
    pub projected_match_score: f64,
    pub estimated_completion_time: String,
    pub steps: serde_json::Value,
    pub recommendations: Vec<String>,
    pub motivational_notes: Vec<String>,
    pub custom_goals: Vec<String>,
    pub status: String,
    pub progress_percent: i16,
    pub completed_competencies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CareerRoadmapRow> for CareerRoadmap {
    type Error = AppError;

    fn try_from(row: CareerRoadmapRow) -> Result<Self, Self::Error> {
        let steps: Vec<DevelopmentStep> = serde_json::from_value(row.steps).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("corrupt steps on roadmap {}: {e}", row.id))
        })?;
        let status = RoadmapStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown status '{}' on roadmap {}",
                row.status,
                row.id
            ))
        })?;
        Ok(CareerRoadmap {
            id: row.id,
            person_id: row.person_id,
            target_role_id: row.target_role_id,
            current_match_score: row.current_match_score,
            projected_match_score: row.projected_match_score,
            estimated_completion_time: row.estimated_completion_time,
            steps,
            recommendations: row.recommendations,
            motivational_notes: row.motivational_notes,
            custom_goals: row.custom_goals,
            status,
            progress_percent: row.progress_percent.clamp(0, 100) as u8,
            completed_competencies: row.completed_competencies,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
