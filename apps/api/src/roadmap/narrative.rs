//! Narrative text for roadmaps: prompt construction, response parsing and the
//! deterministic defaults used whenever the generator cannot be relied on.

use crate::llm_client::prompts::NO_NUMBERS_INSTRUCTION;
use crate::llm_client::strip_json_fences;
use crate::matching::gaps::Gap;
use crate::profile::taxonomy;
use crate::roadmap::prompts::{
    MOTIVATION_PROMPT_TEMPLATE, RECOMMENDATIONS_PROMPT_TEMPLATE, STEP_STRATEGIES_PROMPT_TEMPLATE,
};

/// Upper bound on list items kept from any single completion.
pub const MAX_LIST_ITEMS: usize = 5;
/// Score at or above which the encouraging note acknowledges a strong start.
pub const STRONG_START_SCORE: f64 = 70.0;
/// How many gaps are named in plan-level prompts.
const PROMPT_GAP_COUNT: usize = 5;

/// Everything the plan-level prompts mention about the student and role.
#[derive(Debug, Clone)]
pub struct NarrativeContext<'a> {
    pub student_name: Option<&'a str>,
    pub role_name: &'a str,
    pub match_score: f64,
    pub strengths: &'a [String],
    pub gaps: &'a [Gap],
    pub custom_goals: &'a [String],
}

pub fn recommendations_prompt(ctx: &NarrativeContext<'_>) -> String {
    fill_plan_template(RECOMMENDATIONS_PROMPT_TEMPLATE, ctx)
}

pub fn motivation_prompt(ctx: &NarrativeContext<'_>) -> String {
    fill_plan_template(MOTIVATION_PROMPT_TEMPLATE, ctx)
}

pub fn step_strategies_prompt(role_name: &str, gap: &Gap) -> String {
    STEP_STRATEGIES_PROMPT_TEMPLATE
        .replace("{role_name}", role_name)
        .replace("{competency_name}", &taxonomy::display_name(&gap.competency_id))
        .replace("{current_level}", &gap.current_level.to_string())
        .replace("{target_level}", &gap.required_level.to_string())
        .replace("{no_numbers_instruction}", NO_NUMBERS_INSTRUCTION)
}

fn fill_plan_template(template: &str, ctx: &NarrativeContext<'_>) -> String {
    let strengths = if ctx.strengths.is_empty() {
        "none identified yet".to_string()
    } else {
        ctx.strengths.join(", ")
    };
    let gaps = if ctx.gaps.is_empty() {
        "none".to_string()
    } else {
        ctx.gaps
            .iter()
            .take(PROMPT_GAP_COUNT)
            .map(|g| {
                format!(
                    "{} ({})",
                    taxonomy::display_name(&g.competency_id),
                    g.importance.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    let goals = if ctx.custom_goals.is_empty() {
        "none stated".to_string()
    } else {
        ctx.custom_goals.join("; ")
    };

    template
        .replace("{student_name}", ctx.student_name.unwrap_or("the student"))
        .replace("{role_name}", ctx.role_name)
        .replace("{match_score}", &format!("{:.0}", ctx.match_score))
        .replace("{strengths}", &strengths)
        .replace("{gaps}", &gaps)
        .replace("{custom_goals}", &goals)
        .replace("{no_numbers_instruction}", NO_NUMBERS_INSTRUCTION)
}

/// Parses a completion into a list of short strings.
///
/// Accepts a JSON string array (optionally fenced) or a bulleted / numbered list.
/// Returns `None` for malformed JSON, plain prose, or a list with no usable items.
pub fn parse_string_list(text: &str) -> Option<Vec<String>> {
    let body = strip_json_fences(text);

    let items: Vec<String> = if body.starts_with('[') || body.starts_with('{') {
        serde_json::from_str::<Vec<String>>(body).ok()?
    } else {
        body.lines().filter_map(strip_list_marker).map(str::to_string).collect()
    };

    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_LIST_ITEMS)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// `"- foo"`, `"* foo"`, `"• foo"`, `"1. foo"`, `"2) foo"` → `Some("foo")`; unmarked lines → `None`.
fn strip_list_marker(line: &str) -> Option<&str> {
    let line = line.trim();
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some(rest.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(str::trim)
}

pub fn fallback_recommendations(role_name: &str, gaps: &[Gap]) -> Vec<String> {
    let mut out = Vec::with_capacity(4);
    if gaps.is_empty() {
        out.push(format!(
            "Keep your skills sharp with projects related to {role_name}"
        ));
    } else {
        let focus: Vec<String> = gaps
            .iter()
            .take(2)
            .map(|g| taxonomy::display_name(&g.competency_id))
            .collect();
        out.push(format!(
            "Focus first on {} to move closer to {role_name}",
            focus.join(" and ")
        ));
    }
    out.push(format!(
        "Talk with people working as {role_name} about how they built their skills"
    ));
    out.push("Look for clubs, courses or activities that let you practise regularly".to_string());
    out.push("Review your progress every month and adjust the plan as you grow".to_string());
    out
}

pub fn fallback_motivational_notes(role_name: &str, match_score: f64, strengths: &[String]) -> Vec<String> {
    let mut out = vec![format!(
        "Every step in this plan brings you closer to becoming a {role_name}."
    )];
    if let Some(first) = strengths.first() {
        out.push(format!("Your strength in {first} is a real asset on this path."));
    }
    if match_score >= STRONG_START_SCORE {
        out.push("You already have a strong foundation for this path.".to_string());
    } else {
        out.push("Big goals take time, and starting now puts you ahead.".to_string());
    }
    out
}
