use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

/// A competency level on the 1–10 scale. Every constructor clamps or rejects,
/// so a `CompetencyLevel` is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CompetencyLevel(u8);

impl CompetencyLevel {
    /// Clamps any integer into [1, 10].
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8)
    }

    /// `clamp(round(value / source_max * 10), 1, 10)`.
    ///
    /// Returns `None` when `source_max` is not a positive finite number.
    pub fn normalize(value: f64, source_max: f64) -> Option<Self> {
        if !source_max.is_finite() || source_max <= 0.0 || !value.is_finite() {
            return None;
        }
        Some(Self::clamped((value / source_max * 10.0).round() as i64))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for CompetencyLevel {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (MIN_LEVEL as i64..=MAX_LEVEL as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AppError::Validation(format!(
                "competency level {value} is outside {MIN_LEVEL}..={MAX_LEVEL}"
            )))
        }
    }
}

impl From<CompetencyLevel> for u8 {
    fn from(level: CompetencyLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetencyCategory {
    Academic,
    SocialEmotional,
    Technical,
    Creative,
    Physical,
    Leadership,
    Communication,
}

/// Static reference datum from the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Competency {
    pub id: &'static str,
    pub name: &'static str,
    pub category: CompetencyCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDomain {
    Academic,
    SocialEmotional,
    Interests,
    Activities,
}

/// Where an extracted level came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub domain: SourceDomain,
    pub source_field: String,
    pub recorded_at: DateTime<Utc>,
}

/// One current competency level for a person. At most one per
/// `(person_id, competency_id)` is ever stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyEntry {
    pub person_id: Uuid,
    pub competency_id: String,
    pub current_level: CompetencyLevel,
    pub assessed_at: DateTime<Utc>,
    pub provenance: Provenance,
}

/// A person's normalized competency profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetencyProfile {
    pub person_id: Uuid,
    pub entries: Vec<CompetencyEntry>,
}

impl CompetencyProfile {
    pub fn new(person_id: Uuid, entries: Vec<CompetencyEntry>) -> Self {
        Self { person_id, entries }
    }

    /// Current level for a competency, or `None` when the person has no entry.
    pub fn level_of(&self, competency_id: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|e| e.competency_id == competency_id)
            .map(|e| e.current_level.value())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CompetencyEntryRow {
    pub person_id: Uuid,
    pub competency_id: String,
    pub current_level: i16,
    pub assessed_at: DateTime<Utc>,
    pub provenance: serde_json::Value,
}

impl TryFrom<CompetencyEntryRow> for CompetencyEntry {
    type Error = AppError;

    fn try_from(row: CompetencyEntryRow) -> Result<Self, Self::Error> {
        let provenance: Provenance = serde_json::from_value(row.provenance).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "corrupt provenance for {}/{}: {e}",
                row.person_id,
                row.competency_id
            ))
        })?;
        Ok(CompetencyEntry {
            person_id: row.person_id,
            competency_id: row.competency_id,
            current_level: CompetencyLevel::try_from(row.current_level as i64)?,
            assessed_at: row.assessed_at,
            provenance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_bounds() {
        assert_eq!(CompetencyLevel::clamped(-4).value(), 1);
        assert_eq!(CompetencyLevel::clamped(0).value(), 1);
        assert_eq!(CompetencyLevel::clamped(7).value(), 7);
        assert_eq!(CompetencyLevel::clamped(42).value(), 10);
    }

    #[test]
    fn test_normalize_rounds_to_ten_point_scale() {
        // 85 / 100 * 10 = 8.5 → 9 (round half away from zero)
        assert_eq!(CompetencyLevel::normalize(85.0, 100.0).unwrap().value(), 9);
        assert_eq!(CompetencyLevel::normalize(3.2, 4.0).unwrap().value(), 8);
        assert_eq!(CompetencyLevel::normalize(0.0, 100.0).unwrap().value(), 1);
        assert_eq!(CompetencyLevel::normalize(120.0, 100.0).unwrap().value(), 10);
    }

    #[test]
    fn test_normalize_rejects_bad_scale() {
        assert!(CompetencyLevel::normalize(5.0, 0.0).is_none());
        assert!(CompetencyLevel::normalize(5.0, -10.0).is_none());
        assert!(CompetencyLevel::normalize(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert!(CompetencyLevel::try_from(0).is_err());
        assert!(CompetencyLevel::try_from(11).is_err());
        assert_eq!(CompetencyLevel::try_from(10).unwrap().value(), 10);
    }

    #[test]
    fn test_level_serde_rejects_out_of_range() {
        let ok: CompetencyLevel = serde_json::from_str("6").unwrap();
        assert_eq!(ok.value(), 6);
        assert!(serde_json::from_str::<CompetencyLevel>("12").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "6");
    }

    #[test]
    fn test_category_wire_format() {
        let json = serde_json::to_string(&CompetencyCategory::SocialEmotional).unwrap();
        assert_eq!(json, r#""SOCIAL_EMOTIONAL""#);
    }
}
