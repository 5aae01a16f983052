//! Raw, heterogeneous profile records as read from the Profile Store.
//! Any domain may be empty; extraction treats absence as "no signal".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDomainRecords {
    pub person_id: Uuid,
    pub display_name: Option<String>,
    pub academic: Vec<AcademicRecord>,
    pub social_emotional: Vec<SocialEmotionalRating>,
    pub interests: Option<InterestProfile>,
    pub activities: Vec<ActivityRecord>,
}

/// A graded subject. `score` is on a `0..=scale_max` scale (e.g. 87/100, 3.6/4.0).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AcademicRecord {
    pub subject: String,
    pub score: f64,
    pub scale_max: f64,
    pub recorded_at: DateTime<Utc>,
}

/// A 1–10 rating on a social-emotional dimension such as "self_awareness".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SocialEmotionalRating {
    pub dimension: String,
    pub rating: i16,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterestProfile {
    pub interests: Vec<String>,
    pub talents: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// An extracurricular activity and the person's role in it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityRecord {
    pub name: String,
    pub role: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    pub id: Uuid,
    pub display_name: Option<String>,
}
