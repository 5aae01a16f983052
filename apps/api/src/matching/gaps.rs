//! Gap Analyzer: capability shortfalls and comfortable strengths for one role.

use serde::{Deserialize, Serialize};

use crate::models::competency::{CompetencyProfile, MAX_LEVEL};
use crate::models::role::{Importance, RoleProfile};
use crate::profile::taxonomy;

/// Timeline for competencies the taxonomy does not know about.
pub const UNKNOWN_COMPETENCY_TIMELINE: &str = "6–12 months (low priority)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub competency_id: String,
    pub required_level: u8,
    /// 0 when the person has no entry for this competency.
    pub current_level: u8,
    /// `required_level - current_level`, always > 0.
    pub gap: u8,
    pub importance: Importance,
    pub estimated_development_time: String,
}

/// Every requirement the person falls short of, sorted by importance
/// (CRITICAL first) and then by gap size, largest first.
pub fn analyze_gaps(profile: &CompetencyProfile, role: &RoleProfile) -> Vec<Gap> {
    let mut gaps: Vec<Gap> = role
        .requirements
        .iter()
        .filter_map(|r| {
            let current = profile.level_of(&r.competency_id).unwrap_or(0).min(MAX_LEVEL);
            let required = r.minimum_level.value();
            if required <= current {
                return None;
            }
            let gap = required - current;
            Some(Gap {
                competency_id: r.competency_id.clone(),
                required_level: required,
                current_level: current,
                gap,
                importance: r.importance,
                estimated_development_time: estimate_development_time(
                    &r.competency_id,
                    gap,
                    r.importance,
                ),
            })
        })
        .collect();

    gaps.sort_by(|a, b| {
        a.importance
            .rank()
            .cmp(&b.importance.rank())
            .then(b.gap.cmp(&a.gap))
    });
    gaps
}

/// Display names of requirements met with room to spare: at least two levels
/// above the minimum, or at level 8 or higher.
pub fn identify_strengths(profile: &CompetencyProfile, role: &RoleProfile) -> Vec<String> {
    role.requirements
        .iter()
        .filter(|r| {
            let current = profile.level_of(&r.competency_id).unwrap_or(0);
            let required = r.minimum_level.value();
            current >= required && (current - required >= 2 || current >= 8)
        })
        .map(|r| taxonomy::display_name(&r.competency_id))
        .collect()
}

/// Deterministic timeline estimate keyed by gap size and importance.
pub fn estimate_development_time(competency_id: &str, gap: u8, importance: Importance) -> String {
    if taxonomy::find(competency_id).is_none() {
        return UNKNOWN_COMPETENCY_TIMELINE.to_string();
    }
    let gap = gap as u32;
    let label = match importance {
        Importance::Critical => match gap * 2 {
            m if m <= 3 => "2–3 months (intensive)",
            m if m <= 6 => "4–6 months (regular)",
            _ => "6–12 months (long-term)",
        },
        Importance::High => match gap * 3 {
            m if m <= 4 => "3–4 months (focused)",
            m if m <= 9 => "6–9 months (steady)",
            _ => "9–12 months (long-term)",
        },
        Importance::Medium => match gap * 3 {
            m if m <= 6 => "3–6 months (moderate)",
            _ => "6–12 months (gradual)",
        },
        Importance::Low => match gap * 4 {
            m if m <= 6 => "4–6 months (as time allows)",
            _ => "6–12 months (low priority)",
        },
    };
    label.to_string()
}
