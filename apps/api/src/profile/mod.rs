// Competency Profile
// Implements: the shared taxonomy, rule-based extraction from raw domain records,
// lazy profile creation and explicit refresh.
pub mod extractor;
pub mod handlers;
pub mod service;
pub mod taxonomy;
