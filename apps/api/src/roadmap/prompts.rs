// All narrative prompt templates for the Roadmap module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Plan-level recommendations.
/// Replace: {student_name}, {role_name}, {match_score}, {strengths}, {gaps}, {custom_goals},
///          {no_numbers_instruction}
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"A student is working toward the role "{role_name}".

STUDENT: {student_name}
CURRENT MATCH SCORE: {match_score} out of 100
STRENGTHS: {strengths}
TOP GAPS (most important first): {gaps}
PERSONAL GOALS: {custom_goals}

Write 3 to 5 concrete, actionable recommendations that help this student close the gaps above.
Start each recommendation with a verb. Build on the strengths where it helps.

{no_numbers_instruction}

Return a JSON array of strings, for example:
["Join a weekly coding club to practise programming with peers", "..."]"#;

/// Plan-level encouragement.
/// Replace: {student_name}, {role_name}, {match_score}, {strengths}, {gaps}, {custom_goals},
///          {no_numbers_instruction}
pub const MOTIVATION_PROMPT_TEMPLATE: &str = r#"A student is working toward the role "{role_name}".

STUDENT: {student_name}
CURRENT MATCH SCORE: {match_score} out of 100
STRENGTHS: {strengths}
TOP GAPS (most important first): {gaps}
PERSONAL GOALS: {custom_goals}

Write 2 or 3 short, warm and honest motivational notes addressed to the student.
Acknowledge their strengths by name. Do not promise outcomes.

{no_numbers_instruction}

Return a JSON array of strings."#;

/// Step-level strategies for one competency.
/// Replace: {role_name}, {competency_name}, {current_level}, {target_level}, {no_numbers_instruction}
pub const STEP_STRATEGIES_PROMPT_TEMPLATE: &str = r#"A student preparing for the role "{role_name}" wants to grow in {competency_name}.
They are at level {current_level} of 10 and aim for level {target_level}.

Suggest up to 3 practical learning strategies a student can start this month.

{no_numbers_instruction}

Return a JSON array of strings."#;
