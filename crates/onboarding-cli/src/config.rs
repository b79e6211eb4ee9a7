//! Configuration read from the environment.

use std::time::Duration;

use onboarding_purchase::{DEFAULT_PRODUCT_ID, SandboxOutcome};
use onboarding_questions::QuestionsConfig;
use onboarding_questions::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::error::AppError;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Everything the app needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Question loader settings.
    pub questions: QuestionsConfig,
    /// Tracked subscription product.
    pub product_id: String,
    /// Price the sandbox storefront advertises.
    pub sandbox_price: String,
    /// How the sandbox storefront answers purchases.
    pub sandbox_outcome: SandboxOutcome,
    /// Log line format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url =
            lookup("ONBOARDING_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let timeout = match lookup("ONBOARDING_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|e| {
                AppError::Config(format!(
                    "ONBOARDING_HTTP_TIMEOUT_SECS must be a number of seconds: {e}"
                ))
            })?),
            None => DEFAULT_TIMEOUT,
        };
        let product_id =
            lookup("ONBOARDING_PRODUCT_ID").unwrap_or_else(|| DEFAULT_PRODUCT_ID.to_owned());
        let sandbox_price =
            lookup("ONBOARDING_SANDBOX_PRICE").unwrap_or_else(|| "$6.99".to_owned());
        let sandbox_outcome = match lookup("ONBOARDING_SANDBOX_OUTCOME") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("ONBOARDING_SANDBOX_OUTCOME: {e}")))?,
            None => SandboxOutcome::Success,
        };
        let log_format = match lookup("ONBOARDING_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "ONBOARDING_LOG_FORMAT must be text or json, got {other:?}"
                )));
            }
        };

        Ok(Self {
            questions: QuestionsConfig { base_url, timeout },
            product_id,
            sandbox_price,
            sandbox_outcome,
            log_format,
        })
    }
}
