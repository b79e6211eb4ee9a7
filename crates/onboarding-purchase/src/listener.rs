//! Passive listener over the platform's transaction update stream.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::service::SubscriptionService;

/// Background task that finalizes verified transactions pushed by the
/// platform outside of explicit purchase calls.
///
/// The listener is started once at process start and owned by process-wide
/// state. Failures while handling an update are logged and never reach the
/// foreground flow.
#[derive(Debug)]
pub struct TransactionListener {
    handle: JoinHandle<()>,
}

impl TransactionListener {
    /// Subscribes to the update stream and spawns the draining task.
    ///
    /// The subscription happens before spawning so that updates delivered
    /// right after this call are not missed.
    #[must_use]
    pub fn start(service: Arc<SubscriptionService>) -> Self {
        let mut updates = service.transaction_updates();
        let handle = tokio::spawn(async move {
            info!(product_id = %service.product_id(), "transaction listener started");
            while let Some(update) = updates.next().await {
                let transaction_id = update.payload().id;
                if let Err(error) = service.handle_transaction_update(update).await {
                    warn!(%transaction_id, %error, "failed to process transaction update");
                }
            }
            debug!("transaction update stream ended");
        });
        Self { handle }
    }

    /// Whether the draining task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use onboarding_core::store::{TransactionId, VerificationResult};
    use onboarding_test_support::{
        ScriptedStorefront, WEEKLY_PRODUCT_ID, transaction, weekly_offer,
    };

    use super::TransactionListener;
    use crate::service::SubscriptionService;

    async fn wait_until_stopped(listener: &TransactionListener) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while listener.is_running() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("listener did not stop");
    }

    #[tokio::test]
    async fn test_listener_finalizes_verified_updates_once() {
        // Arrange
        let storefront = Arc::new(ScriptedStorefront::new(vec![weekly_offer()]));
        let service = Arc::new(SubscriptionService::new(
            storefront.clone(),
            WEEKLY_PRODUCT_ID,
        ));
        let listener = TransactionListener::start(service);

        // Act
        storefront.push_update(VerificationResult::Verified(transaction(1, WEEKLY_PRODUCT_ID)));
        storefront.push_update(VerificationResult::Verified(transaction(1, WEEKLY_PRODUCT_ID)));
        storefront.push_update(VerificationResult::Verified(transaction(2, WEEKLY_PRODUCT_ID)));
        storefront.close_updates();
        wait_until_stopped(&listener).await;

        // Assert
        assert_eq!(
            storefront.finished_transactions(),
            vec![TransactionId(1), TransactionId(2)]
        );
    }

    #[tokio::test]
    async fn test_listener_survives_unverified_and_foreign_updates() {
        // Arrange
        let storefront = Arc::new(ScriptedStorefront::new(vec![weekly_offer()]));
        let service = Arc::new(SubscriptionService::new(
            storefront.clone(),
            WEEKLY_PRODUCT_ID,
        ));
        let listener = TransactionListener::start(service);

        // Act
        storefront.push_update(VerificationResult::Unverified(
            transaction(3, WEEKLY_PRODUCT_ID),
            "bad signature".into(),
        ));
        storefront.push_update(VerificationResult::Verified(transaction(4, "com.other.product")));
        storefront.push_update(VerificationResult::Verified(transaction(5, WEEKLY_PRODUCT_ID)));
        storefront.close_updates();
        wait_until_stopped(&listener).await;

        // Assert
        assert_eq!(storefront.finished_transactions(), vec![TransactionId(5)]);
    }

    #[tokio::test]
    async fn test_listener_stays_running_while_stream_is_open() {
        let storefront = Arc::new(ScriptedStorefront::new(vec![weekly_offer()]));
        let service = Arc::new(SubscriptionService::new(
            storefront.clone(),
            WEEKLY_PRODUCT_ID,
        ));

        let listener = TransactionListener::start(service);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(listener.is_running());
    }
}
