//! Canned model values shared by tests.

use chrono::{DateTime, TimeZone, Utc};
use onboarding_core::question::Question;
use onboarding_core::store::{Offer, Transaction, TransactionId};

/// Product identifier used by the fixture offer.
pub const WEEKLY_PRODUCT_ID: &str = "com.ivanpetrov.OnboardingApp.weekly_premium";

/// Fixed timestamp used across tests.
///
/// # Panics
///
/// Never in practice; the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// Builds `count` questions with ids `1..=count`, each with three answers.
#[must_use]
pub fn sample_questions(count: usize) -> Vec<Question> {
    (1..=count)
        .map(|n| Question {
            id: i64::try_from(n).unwrap_or(i64::MAX),
            prompt: format!("Question {n}?"),
            answers: vec![
                format!("Answer {n}.a"),
                format!("Answer {n}.b"),
                format!("Answer {n}.c"),
            ],
        })
        .collect()
}

/// The weekly subscription offer.
#[must_use]
pub fn weekly_offer() -> Offer {
    Offer {
        product_id: WEEKLY_PRODUCT_ID.to_owned(),
        display_name: "Weekly Premium".to_owned(),
        display_price: "$6.99".to_owned(),
    }
}

/// A transaction for `product_id` stamped with [`fixed_now`].
#[must_use]
pub fn transaction(id: u64, product_id: &str) -> Transaction {
    Transaction {
        id: TransactionId(id),
        product_id: product_id.to_owned(),
        purchased_at: fixed_now(),
    }
}
