// Matching Engine
// Implements: weighted-coverage scoring, tiers, ranking, gap analysis, alternative metrics.
// Scoring is pure and synchronous; only the service layer touches stores.

pub mod gaps;
pub mod handlers;
pub mod metrics;
pub mod scoring;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
