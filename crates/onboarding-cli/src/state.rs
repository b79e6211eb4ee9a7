//! Process-wide state.

use std::sync::Arc;

use onboarding_core::clock::Clock;
use onboarding_core::store::Offer;
use onboarding_purchase::{SandboxStorefront, SubscriptionService, TransactionListener};

use crate::config::AppConfig;

/// State that lives for the whole process, independent of any flow run.
#[derive(Debug)]
pub struct AppState {
    /// Purchase wrapper shared by every paywall.
    pub subscriptions: Arc<SubscriptionService>,
    /// Background transaction listener; never torn down explicitly.
    pub listener: TransactionListener,
}

impl AppState {
    /// Builds the storefront and purchase wrapper and starts the listener.
    #[must_use]
    pub fn start(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let offer = Offer {
            product_id: config.product_id.clone(),
            display_name: "Weekly Premium".to_owned(),
            display_price: config.sandbox_price.clone(),
        };
        let storefront = Arc::new(SandboxStorefront::new(
            vec![offer],
            config.sandbox_outcome,
            clock,
        ));
        let subscriptions = Arc::new(SubscriptionService::new(
            storefront,
            config.product_id.clone(),
        ));
        let listener = TransactionListener::start(Arc::clone(&subscriptions));

        Self {
            subscriptions,
            listener,
        }
    }
}
