//! Test fetchers: canned `QuestionFetcher` implementations.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use onboarding_core::error::FetchError;
use onboarding_core::fetcher::QuestionFetcher;
use onboarding_core::question::Question;

/// A fetcher that returns the same question list on every call and counts
/// how often it was asked.
#[derive(Debug)]
pub struct StaticQuestionFetcher {
    questions: Vec<Question>,
    calls: AtomicUsize,
}

impl StaticQuestionFetcher {
    /// Create a fetcher returning `questions`.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch_questions` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionFetcher for StaticQuestionFetcher {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.questions.clone())
    }
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Network,
    BadStatus(u16),
    Decode,
}

/// A fetcher that always fails with the configured reason.
#[derive(Debug, Clone, Copy)]
pub struct FailingQuestionFetcher(Failure);

impl FailingQuestionFetcher {
    /// Fails with a refused connection.
    #[must_use]
    pub fn network() -> Self {
        Self(Failure::Network)
    }

    /// Fails with the given HTTP status.
    #[must_use]
    pub fn bad_status(code: u16) -> Self {
        Self(Failure::BadStatus(code))
    }

    /// Fails with a payload decoding error.
    #[must_use]
    pub fn decode() -> Self {
        Self(Failure::Decode)
    }
}

#[async_trait]
impl QuestionFetcher for FailingQuestionFetcher {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        Err(match self.0 {
            Failure::Network => FetchError::Network(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Failure::BadStatus(code) => FetchError::BadStatus(code),
            Failure::Decode => {
                let err = serde_json::from_str::<Vec<Question>>("{\"items\":").unwrap_err();
                FetchError::Decode(Box::new(err))
            }
        })
    }
}
