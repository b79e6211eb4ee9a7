//! Question loader port.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::question::Question;

/// Source of onboarding questions.
#[async_trait]
pub trait QuestionFetcher: Send + Sync {
    /// Fetches the question list in server-defined order.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure, a non-2xx status or an
    /// undecodable payload.
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError>;
}
