//! Shared test fakes and fixtures for the onboarding crates.

mod clock;
mod fetcher;
mod fixtures;
mod storefront;

pub use clock::FixedClock;
pub use fetcher::{FailingQuestionFetcher, StaticQuestionFetcher};
pub use fixtures::{WEEKLY_PRODUCT_ID, fixed_now, sample_questions, transaction, weekly_offer};
pub use storefront::ScriptedStorefront;
