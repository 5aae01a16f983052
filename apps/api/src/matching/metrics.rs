//! Alternative similarity metrics for validating the primary score.
//!
//! Not used for ranking. `compare_metrics` reports all three side by side.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::matching::scoring::weighted_coverage;
use crate::models::competency::CompetencyProfile;
use crate::models::role::RoleProfile;

/// A 0–100 similarity between a profile and a role.
pub trait SimilarityMetric: Send + Sync {
    fn name(&self) -> &'static str;
    fn similarity(&self, profile: &CompetencyProfile, role: &RoleProfile) -> f64;
}

pub struct WeightedCoverage;
pub struct Cosine;
pub struct InverseEuclidean;

impl SimilarityMetric for WeightedCoverage {
    fn name(&self) -> &'static str {
        "weighted_coverage"
    }

    fn similarity(&self, profile: &CompetencyProfile, role: &RoleProfile) -> f64 {
        weighted_coverage(profile, role)
    }
}

impl SimilarityMetric for Cosine {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn similarity(&self, profile: &CompetencyProfile, role: &RoleProfile) -> f64 {
        cosine_similarity(profile, role)
    }
}

impl SimilarityMetric for InverseEuclidean {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn similarity(&self, profile: &CompetencyProfile, role: &RoleProfile) -> f64 {
        inverse_euclidean(profile, role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub weighted_coverage: f64,
    pub cosine: f64,
    pub euclidean: f64,
}

pub fn compare_metrics(profile: &CompetencyProfile, role: &RoleProfile) -> MetricComparison {
    MetricComparison {
        weighted_coverage: WeightedCoverage.similarity(profile, role),
        cosine: Cosine.similarity(profile, role),
        euclidean: InverseEuclidean.similarity(profile, role),
    }
}

/// Cosine over the union of competency ids on either side:
/// profile levels vs requirement minimums, zero where absent. 0 if either vector is zero.
pub fn cosine_similarity(profile: &CompetencyProfile, role: &RoleProfile) -> f64 {
    let ids: BTreeSet<&str> = profile
        .entries
        .iter()
        .map(|e| e.competency_id.as_str())
        .chain(role.requirements.iter().map(|r| r.competency_id.as_str()))
        .collect();

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for id in ids {
        let a = profile.level_of(id).unwrap_or(0) as f64;
        let b = role
            .requirements
            .iter()
            .find(|r| r.competency_id == id)
            .map(|r| r.minimum_level.value() as f64)
            .unwrap_or(0.0);
        dot += a * b;
        norm_a += a * a;
        norm_b += b * b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt()) * 100.0
}

/// `max(0, (1 - rms_distance / 10) × 100)` over the role's requirements.
/// The distance is signed per requirement before squaring, so surplus counts as distance too.
pub fn inverse_euclidean(profile: &CompetencyProfile, role: &RoleProfile) -> f64 {
    if role.requirements.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = role
        .requirements
        .iter()
        .map(|r| {
            let diff = r.minimum_level.value() as f64 - profile.level_of(&r.competency_id).unwrap_or(0) as f64;
            diff * diff
        })
        .sum();
    let distance = (sum_sq / role.requirements.len() as f64).sqrt();
    ((1.0 - distance / 10.0) * 100.0).max(0.0)
}
