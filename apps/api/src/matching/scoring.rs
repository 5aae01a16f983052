//! Match Scoring: weighted normalized coverage of a role's requirements.
//!
//! Algorithm:
//! 1. For each requirement: `normalized = min(level / minimum_level, 1)` (missing level = 0)
//! 2. `match_score = 100 × Σ(normalized × weight) / Σ(weight)`, 0 when Σ(weight) is 0
//! 3. Tier from fixed thresholds, priority from score and critical gap count
//!
//! Over-qualification earns no extra credit here; it shows up as strengths.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::gaps::{analyze_gaps, identify_strengths, Gap};
use crate::models::competency::CompetencyProfile;
use crate::models::role::{Importance, RoleProfile};

/// How many top matches feed the overall compatibility figure.
pub const OVERALL_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityTier {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl CompatibilityTier {
    /// Inclusive lower bounds: 85, 70, 50.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            CompatibilityTier::Excellent
        } else if score >= 70.0 {
            CompatibilityTier::Good
        } else if score >= 50.0 {
            CompatibilityTier::Moderate
        } else {
            CompatibilityTier::Low
        }
    }
}

/// Urgency of development for a role. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DevelopmentPriority {
    Low,
    Medium,
    High,
}

impl DevelopmentPriority {
    pub fn from_score_and_gaps(score: f64, critical_gaps: usize) -> Self {
        if score < 50.0 || critical_gaps > 2 {
            DevelopmentPriority::High
        } else if score < 70.0 || critical_gaps > 0 {
            DevelopmentPriority::Medium
        } else {
            DevelopmentPriority::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub role_id: Uuid,
    pub role_name: String,
    pub role_category: String,
    pub match_score: f64,
    pub compatibility_tier: CompatibilityTier,
    pub strengths: Vec<String>,
    pub gaps: Vec<Gap>,
    pub development_priority: DevelopmentPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatches {
    pub matches: Vec<MatchResult>,
    pub overall_compatibility: f64,
}

/// `min(level / minimum_level, 1)`, always within [0, 1].
pub fn normalized_coverage(level: u8, minimum_level: u8) -> f64 {
    if minimum_level == 0 {
        return 1.0;
    }
    (level as f64 / minimum_level as f64).clamp(0.0, 1.0)
}

/// Primary metric, unrounded. Exactly 100 only when every weighted requirement is
/// fully met; otherwise strictly below 100.
pub fn weighted_coverage(profile: &CompetencyProfile, role: &RoleProfile) -> f64 {
    let mut weighted_sum = 0.0_f64;
    let mut total_weight = 0.0_f64;
    let mut fully_covered = true;

    for r in &role.requirements {
        let level = profile.level_of(&r.competency_id).unwrap_or(0);
        let normalized = normalized_coverage(level, r.minimum_level.value());
        if r.weight > 0.0 && normalized < 1.0 {
            fully_covered = false;
        }
        weighted_sum += normalized * r.weight;
        total_weight += r.weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }
    if fully_covered {
        return 100.0;
    }
    let score = (100.0 * weighted_sum / total_weight).max(0.0);
    if score >= 100.0 {
        // Largest f64 below 100.
        return f64::from_bits(100.0_f64.to_bits() - 1);
    }
    score
}

/// Scores one role and attaches its gaps, strengths, tier and priority.
pub fn score(profile: &CompetencyProfile, role: &RoleProfile) -> MatchResult {
    let match_score = weighted_coverage(profile, role);
    let gaps = analyze_gaps(profile, role);
    let strengths = identify_strengths(profile, role);
    let critical_gaps = gaps
        .iter()
        .filter(|g| g.importance == Importance::Critical)
        .count();

    MatchResult {
        role_id: role.id,
        role_name: role.name.clone(),
        role_category: role.category.clone(),
        match_score,
        compatibility_tier: CompatibilityTier::from_score(match_score),
        strengths,
        gaps,
        development_priority: DevelopmentPriority::from_score_and_gaps(match_score, critical_gaps),
    }
}

/// Scores every role and orders the full set by score descending, then by
/// development priority ascending (`Low` first) on exact ties. Truncates to `limit`.
pub fn rank(profile: &CompetencyProfile, roles: &[RoleProfile], limit: usize) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = roles.iter().map(|r| score(profile, r)).collect();
    sort_matches(&mut results);
    results.truncate(limit);
    results
}

/// Deterministic ordering over a complete, unordered result set. Full ties fall
/// back to role name, then role id.
pub fn sort_matches(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
            .then(a.development_priority.cmp(&b.development_priority))
            .then_with(|| a.role_name.cmp(&b.role_name))
            .then_with(|| a.role_id.cmp(&b.role_id))
    });
}

/// Mean of the top five scores of an already-ranked list, to one decimal.
pub fn overall_compatibility(ranked: &[MatchResult]) -> f64 {
    let top: Vec<f64> = ranked
        .iter()
        .take(OVERALL_TOP_N)
        .map(|m| m.match_score)
        .collect();
    if top.is_empty() {
        return 0.0;
    }
    let mean = top.iter().sum::<f64>() / top.len() as f64;
    (mean * 10.0).round() / 10.0
}
