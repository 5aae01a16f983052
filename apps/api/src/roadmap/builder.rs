//! Roadmap Builder: turns a role's gaps into a staged development plan.
//!
//! Flow: score role → select top gaps → steps (strategies, resources, milestones)
//!       → projected score + completion estimate → narrative text (or fallback).
//!
//! Everything except the narrative calls is pure. Each narrative call is a single
//! attempt bounded by `timeout`; any failure falls back to deterministic text.
//! All calls for one roadmap run concurrently, so a stalled generator costs at
//! most one `timeout`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Months, NaiveDate, Utc};
use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::llm_client::{CompletionOptions, LlmError, NarrativeGenerator};
use crate::matching::gaps::Gap;
use crate::matching::scoring::score;
use crate::models::competency::CompetencyProfile;
use crate::models::roadmap::{CareerRoadmap, DevelopmentStep, Milestone, RoadmapStatus};
use crate::models::role::{Importance, RoleProfile};
use crate::profile::taxonomy;
use crate::roadmap::narrative::{
    fallback_motivational_notes, fallback_recommendations, motivation_prompt, parse_string_list,
    recommendations_prompt, step_strategies_prompt, NarrativeContext,
};
use crate::roadmap::plans::{resources_for, strategies_for};

/// How many gaps become development steps.
pub const MAX_STEPS: usize = 8;
/// Projected score ceiling while any gap remains.
pub const PROJECTED_CEILING_WITH_GAPS: f64 = 95.0;
const MAX_ENRICHED_STRATEGIES: usize = 3;

const RECOMMENDATION_TEMPERATURE: f32 = 0.7;
const MOTIVATION_TEMPERATURE: f32 = 0.8;
const STRATEGY_TEMPERATURE: f32 = 0.5;

/// Inputs for one roadmap.
#[derive(Debug, Clone)]
pub struct RoadmapRequest<'a> {
    pub person_id: Uuid,
    pub person_name: Option<&'a str>,
    pub profile: &'a CompetencyProfile,
    pub role: &'a RoleProfile,
    pub custom_goals: Vec<String>,
    pub now: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RoadmapBuilder {
    narrative: Arc<dyn NarrativeGenerator>,
    timeout: Duration,
    enrich_steps: bool,
}

impl RoadmapBuilder {
    pub fn new(narrative: Arc<dyn NarrativeGenerator>, timeout: Duration, enrich_steps: bool) -> Self {
        Self {
            narrative,
            timeout,
            enrich_steps,
        }
    }

    /// Builds a new ACTIVE roadmap. Never fails: narrative problems are absorbed.
    pub async fn build(&self, req: RoadmapRequest<'_>) -> CareerRoadmap {
        let result = score(req.profile, req.role);
        let today = req.now.date_naive();

        let selected = select_step_gaps(&result.gaps);
        let mut steps: Vec<DevelopmentStep> = selected.iter().map(|g| build_step(g, today)).collect();
        let step_prompts: Vec<String> = if self.enrich_steps {
            selected
                .iter()
                .map(|g| step_strategies_prompt(&req.role.name, g))
                .collect()
        } else {
            Vec::new()
        };

        let ctx = NarrativeContext {
            student_name: req.person_name,
            role_name: &req.role.name,
            match_score: result.match_score,
            strengths: &result.strengths,
            gaps: &result.gaps,
            custom_goals: &req.custom_goals,
        };
        let rec_prompt = recommendations_prompt(&ctx);
        let mot_prompt = motivation_prompt(&ctx);
        let (enriched, recommendations, motivational_notes) = tokio::join!(
            join_all(
                step_prompts
                    .iter()
                    .map(|p| self.narrate("step_strategies", p, STRATEGY_TEMPERATURE)),
            ),
            self.narrate("recommendations", &rec_prompt, RECOMMENDATION_TEMPERATURE),
            self.narrate("motivation", &mot_prompt, MOTIVATION_TEMPERATURE),
        );

        for (step, strategies) in steps.iter_mut().zip(enriched) {
            if let Some(strategies) = strategies {
                step.strategies = strategies.into_iter().take(MAX_ENRICHED_STRATEGIES).collect();
            }
        }
        let recommendations =
            recommendations.unwrap_or_else(|| fallback_recommendations(&req.role.name, &result.gaps));
        let motivational_notes = motivational_notes.unwrap_or_else(|| {
            fallback_motivational_notes(&req.role.name, result.match_score, &result.strengths)
        });

        CareerRoadmap {
            id: Uuid::new_v4(),
            person_id: req.person_id,
            target_role_id: req.role.id,
            current_match_score: result.match_score,
            projected_match_score: projected_match_score(result.match_score, result.gaps.len()),
            estimated_completion_time: estimate_completion_time(&steps).to_string(),
            steps,
            recommendations,
            motivational_notes,
            custom_goals: req.custom_goals,
            status: RoadmapStatus::Active,
            progress_percent: 0,
            completed_competencies: Vec::new(),
            created_at: req.now,
            updated_at: req.now,
        }
    }

    /// One bounded attempt. `None` means the caller should use its fallback.
    async fn narrate(&self, kind: &'static str, prompt: &str, temperature: f32) -> Option<Vec<String>> {
        let options = CompletionOptions { temperature };
        let outcome = match tokio::time::timeout(self.timeout, self.narrative.complete(prompt, options)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) => match parse_string_list(&text) {
                Some(items) => {
                    debug!("Narrative {kind}: {} items", items.len());
                    Some(items)
                }
                None => {
                    warn!("Narrative {kind} response was unparsable, using fallback");
                    None
                }
            },
            Err(LlmError::Disabled) => {
                debug!("Narrative {kind} disabled, using fallback");
                None
            }
            Err(e) => {
                warn!("Narrative {kind} failed, using fallback: {e}");
                None
            }
        }
    }
}

/// The first `MAX_STEPS` gaps, stably re-sorted by importance alone.
pub fn select_step_gaps(gaps: &[Gap]) -> Vec<Gap> {
    let mut selected: Vec<Gap> = gaps.iter().take(MAX_STEPS).cloned().collect();
    selected.sort_by_key(|g| g.importance.rank());
    selected
}

pub fn build_step(gap: &Gap, today: NaiveDate) -> DevelopmentStep {
    DevelopmentStep {
        competency_id: gap.competency_id.clone(),
        current_level: gap.current_level,
        target_level: gap.required_level,
        priority: gap.importance,
        timeline: gap.estimated_development_time.clone(),
        strategies: strategies_for(&gap.competency_id),
        resources: resources_for(&gap.competency_id),
        milestones: milestones_for(gap, today),
    }
}

/// One milestone at two months for a distance of at most 2 levels,
/// otherwise a midpoint at three months and the target at six.
pub fn milestones_for(gap: &Gap, today: NaiveDate) -> Vec<Milestone> {
    let name = taxonomy::display_name(&gap.competency_id);
    let current = gap.current_level;
    let target = gap.required_level;

    if target.saturating_sub(current) <= 2 {
        return vec![milestone(&name, target, add_months(today, 2), true)];
    }
    let midpoint = current + (target - current) / 2;
    vec![
        milestone(&name, midpoint, add_months(today, 3), false),
        milestone(&name, target, add_months(today, 6), true),
    ]
}

fn milestone(name: &str, level: u8, target_date: NaiveDate, is_final: bool) -> Milestone {
    let mut success_criteria = vec![
        format!("Consistently demonstrate level {level} {name} in class or activities"),
        format!("Complete the planned practice activities for {name}"),
    ];
    if is_final {
        success_criteria.push(format!("Receive feedback confirming readiness in {name}"));
    }
    Milestone {
        description: format!("Reach level {level} in {name}"),
        target_date,
        success_criteria,
    }
}

/// Saturates at `NaiveDate::MAX` so a milestone never lands before `date`.
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Never below `current`. With gaps the boost is at most 30 and the result at most 95,
/// unless `current` already exceeds 95, in which case it stays at `current`.
pub fn projected_match_score(current: f64, gap_count: usize) -> f64 {
    if gap_count == 0 {
        return (current + 10.0).min(100.0);
    }
    let boost = (gap_count as f64 * 5.0).min(30.0);
    (current + boost)
        .round()
        .min(PROJECTED_CEILING_WITH_GAPS)
        .max(current)
}

/// `3·critical + 2·high + 1·other` months, bucketed.
pub fn estimate_completion_time(steps: &[DevelopmentStep]) -> &'static str {
    let months: u32 = steps
        .iter()
        .map(|s| match s.priority {
            Importance::Critical => 3,
            Importance::High => 2,
            Importance::Medium | Importance::Low => 1,
        })
        .sum();
    match months {
        0..=6 => "3–6 months",
        7..=12 => "6–12 months",
        13..=18 => "12–18 months",
        _ => "18–24 months",
    }
}
