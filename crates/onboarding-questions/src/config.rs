//! Endpoint configuration for the question loader.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://test-ios.universeapps.limited/";

/// Path of the questions endpoint, relative to the base URL.
pub const ONBOARDING_PATH: &str = "onboarding";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors raised while turning configuration into a working fetcher.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL does not parse or cannot be joined with the endpoint path.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The offending value.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where and how to fetch the onboarding questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionsConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl QuestionsConfig {
    /// Resolves the full questions endpoint URL.
    ///
    /// A missing trailing slash on the base URL is tolerated so that
    /// `https://host/api` and `https://host/api/` both resolve to
    /// `https://host/api/onboarding`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the base URL does not parse.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut base = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_owned()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(ONBOARDING_PATH)
            .map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_points_at_onboarding_path() {
        let config = QuestionsConfig::default();

        let endpoint = config.endpoint().unwrap();

        assert_eq!(
            endpoint.as_str(),
            "https://test-ios.universeapps.limited/onboarding"
        );
    }

    #[test]
    fn test_endpoint_tolerates_missing_trailing_slash() {
        let config = QuestionsConfig {
            base_url: "http://127.0.0.1:8080/api".to_owned(),
            timeout: DEFAULT_TIMEOUT,
        };

        let endpoint = config.endpoint().unwrap();

        assert_eq!(endpoint.as_str(), "http://127.0.0.1:8080/api/onboarding");
    }

    #[test]
    fn test_endpoint_rejects_unparseable_base_url() {
        let config = QuestionsConfig {
            base_url: "not a url".to_owned(),
            timeout: DEFAULT_TIMEOUT,
        };

        match config.endpoint() {
            Err(ConfigError::InvalidBaseUrl { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("expected InvalidBaseUrl, got {other:?}"),
        }
    }
}
