//! `QuestionFetcher` backed by a single HTTP GET.

use async_trait::async_trait;
use onboarding_core::error::FetchError;
use onboarding_core::fetcher::QuestionFetcher;
use onboarding_core::question::Question;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{ConfigError, QuestionsConfig};

/// Wire envelope returned by the questions endpoint.
#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    items: Vec<Question>,
}

/// Fetches onboarding questions from the backend.
#[derive(Debug, Clone)]
pub struct HttpQuestionFetcher {
    client: Client,
    endpoint: Url,
}

impl HttpQuestionFetcher {
    /// Builds a fetcher for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &QuestionsConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint()?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// The URL this fetcher requests.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl QuestionFetcher for HttpQuestionFetcher {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        debug!(endpoint = %self.endpoint, "fetching onboarding questions");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(Box::new(e)))?;
        let payload: QuestionsResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(Box::new(e)))?;

        info!(count = payload.items.len(), "loaded onboarding questions");
        Ok(payload.items)
    }
}
