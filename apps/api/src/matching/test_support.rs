//! Fixture builders shared by the matching and roadmap tests.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::models::competency::{
    CompetencyEntry, CompetencyLevel, CompetencyProfile, Provenance, SourceDomain,
};
use crate::models::role::{Importance, RoleProfile, RoleRequirement};

pub fn profile(levels: &[(&str, u8)]) -> CompetencyProfile {
    let person_id = Uuid::new_v4();
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
    CompetencyProfile::new(
        person_id,
        levels
            .iter()
            .map(|(id, level)| CompetencyEntry {
                person_id,
                competency_id: id.to_string(),
                current_level: CompetencyLevel::clamped(*level as i64),
                assessed_at: at,
                provenance: Provenance {
                    domain: SourceDomain::SocialEmotional,
                    source_field: "fixture".to_string(),
                    recorded_at: at,
                },
            })
            .collect(),
    )
}

pub fn role(requirements: &[(&str, u8, Importance, f64)]) -> RoleProfile {
    role_named("Test Role", requirements)
}

pub fn role_named(name: &str, requirements: &[(&str, u8, Importance, f64)]) -> RoleProfile {
    RoleProfile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category: "technology".to_string(),
        requirements: requirements
            .iter()
            .map(|(id, min, importance, weight)| RoleRequirement {
                competency_id: id.to_string(),
                minimum_level: CompetencyLevel::clamped(*min as i64),
                importance: *importance,
                weight: *weight,
            })
            .collect(),
    }
}
