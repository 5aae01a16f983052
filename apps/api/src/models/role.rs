use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competency::CompetencyLevel;

/// Requirement importance. Declaration order is the gap sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

impl Importance {
    /// 0 for CRITICAL through 3 for LOW.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Critical => "critical",
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "critical" => Some(Importance::Critical),
            "high" => Some(Importance::High),
            "medium" => Some(Importance::Medium),
            "low" => Some(Importance::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub competency_id: String,
    pub minimum_level: CompetencyLevel,
    pub importance: Importance,
    pub weight: f64,
}

/// A target role from the catalog. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub requirements: Vec<RoleRequirement>,
}

impl RoleProfile {
    /// Rejects definitions the scorer cannot meaningfully use.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.requirements.is_empty() {
            return Err(AppError::Validation(format!(
                "role '{}' has no requirements",
                self.name
            )));
        }
        if let Some(r) = self
            .requirements
            .iter()
            .find(|r| !r.weight.is_finite() || r.weight < 0.0)
        {
            return Err(AppError::Validation(format!(
                "role '{}' requirement '{}' has invalid weight {}",
                self.name, r.competency_id, r.weight
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleRequirementRow {
    pub role_id: Uuid,
    pub competency_id: String,
    pub minimum_level: i16,
    pub importance: String,
    pub weight: f64,
}

impl TryFrom<RoleRequirementRow> for RoleRequirement {
    type Error = AppError;

    fn try_from(row: RoleRequirementRow) -> Result<Self, Self::Error> {
        let importance = Importance::parse(&row.importance).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown importance '{}' on role {}",
                row.importance, row.role_id
            ))
        })?;
        Ok(RoleRequirement {
            competency_id: row.competency_id,
            minimum_level: CompetencyLevel::try_from(row.minimum_level as i64)?,
            importance,
            weight: row.weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(weight: f64) -> RoleRequirement {
        RoleRequirement {
            competency_id: "programming".to_string(),
            minimum_level: CompetencyLevel::clamped(6),
            importance: Importance::High,
            weight,
        }
    }

    #[test]
    fn test_importance_order_is_critical_first() {
        let mut v = vec![Importance::Low, Importance::Critical, Importance::Medium, Importance::High];
        v.sort();
        assert_eq!(
            v,
            vec![Importance::Critical, Importance::High, Importance::Medium, Importance::Low]
        );
        assert_eq!(Importance::Critical.rank(), 0);
        assert_eq!(Importance::Low.rank(), 3);
    }

    #[test]
    fn test_importance_parse_is_case_insensitive() {
        assert_eq!(Importance::parse("CRITICAL"), Some(Importance::Critical));
        assert_eq!(Importance::parse("medium"), Some(Importance::Medium));
        assert_eq!(Importance::parse("urgent"), None);
    }

    #[test]
    fn test_validate_rejects_empty_requirements() {
        let role = RoleProfile {
            id: Uuid::new_v4(),
            name: "Empty".to_string(),
            category: "none".to_string(),
            requirements: vec![],
        };
        assert!(matches!(role.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let role = RoleProfile {
            id: Uuid::new_v4(),
            name: "Broken".to_string(),
            category: "technology".to_string(),
            requirements: vec![requirement(-0.5)],
        };
        assert!(role.validate().is_err());

        let ok = RoleProfile {
            requirements: vec![requirement(0.0)],
            ..role
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_requirement_row_conversion() {
        let row = RoleRequirementRow {
            role_id: Uuid::new_v4(),
            competency_id: "teamwork".to_string(),
            minimum_level: 7,
            importance: "high".to_string(),
            weight: 0.3,
        };
        let req = RoleRequirement::try_from(row).unwrap();
        assert_eq!(req.minimum_level.value(), 7);
        assert_eq!(req.importance, Importance::High);

        let bad = RoleRequirementRow {
            role_id: Uuid::new_v4(),
            competency_id: "teamwork".to_string(),
            minimum_level: 14,
            importance: "high".to_string(),
            weight: 0.3,
        };
        assert!(RoleRequirement::try_from(bad).is_err());
    }
}
