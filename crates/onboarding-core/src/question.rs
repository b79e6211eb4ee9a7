//! Onboarding question record.

use serde::{Deserialize, Serialize};

/// A single multiple-choice onboarding question, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Server-assigned identifier.
    pub id: i64,
    /// Prompt text shown above the answers.
    #[serde(rename = "question")]
    pub prompt: String,
    /// Answer options in display order.
    pub answers: Vec<String>,
}

impl Question {
    /// Number of answer options.
    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Returns the answer text at `index`, if it exists.
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }
}
