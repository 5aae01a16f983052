use crate::config::Config;
use crate::roadmap::builder::RoadmapBuilder;
use crate::store::Stores;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Store seams. Postgres in production, in-memory in tests.
    pub stores: Stores,
    /// Carries the injected Narrative Generator and its timeout.
    pub roadmap_builder: RoadmapBuilder,
    pub config: Config,
}
