// Roadmap Builder
// Implements: gap-driven development steps, milestones, projected score,
// completion estimate and narrative text with deterministic fallback.
pub mod builder;
pub mod handlers;
pub mod narrative;
pub mod plans;
pub mod prompts;
pub mod service;
