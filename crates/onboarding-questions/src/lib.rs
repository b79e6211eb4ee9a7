//! Onboarding Questions: loads the questionnaire from the backend.
//!
//! One GET request, one fixed JSON shape, no retries and no caching.

pub mod config;
pub mod http_fetcher;

pub use config::{ConfigError, QuestionsConfig};
pub use http_fetcher::HttpQuestionFetcher;
