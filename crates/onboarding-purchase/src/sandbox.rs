//! Local in-memory storefront for running the onboarding without a platform
//! store.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use onboarding_core::clock::Clock;
use onboarding_core::error::StoreError;
use onboarding_core::store::{
    Offer, StorePurchaseResult, Storefront, Transaction, TransactionId, TransactionUpdates,
    VerificationResult,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

const UPDATE_BUFFER: usize = 16;

/// How the sandbox answers purchase calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxOutcome {
    /// Produce a verified transaction.
    Success,
    /// Behave as if the user dismissed the sheet.
    Cancel,
    /// Behave as if approval is pending.
    Pending,
    /// Produce a transaction that fails verification.
    Unverified,
    /// Reject the purchase outright.
    Fail,
}

/// Unknown sandbox outcome name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sandbox outcome {0:?}; expected success, cancel, pending, unverified or fail")]
pub struct ParseSandboxOutcomeError(String);

impl FromStr for SandboxOutcome {
    type Err = ParseSandboxOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "cancel" => Ok(Self::Cancel),
            "pending" => Ok(Self::Pending),
            "unverified" => Ok(Self::Unverified),
            "fail" => Ok(Self::Fail),
            _ => Err(ParseSandboxOutcomeError(s.to_owned())),
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    unfinished: Vec<Transaction>,
    entitlements: Vec<Transaction>,
}

/// An in-memory storefront with a fixed catalog.
///
/// Successful purchases are also echoed on the transaction update stream,
/// the way a platform store re-delivers transactions it has not seen
/// acknowledged.
pub struct SandboxStorefront {
    catalog: Vec<Offer>,
    outcome: SandboxOutcome,
    clock: Arc<dyn Clock>,
    next_id: AtomicU64,
    ledger: Mutex<Ledger>,
    updates: broadcast::Sender<VerificationResult<Transaction>>,
}

impl std::fmt::Debug for SandboxStorefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxStorefront")
            .field("catalog", &self.catalog)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl SandboxStorefront {
    /// Create a sandbox selling `catalog` and answering every purchase with
    /// `outcome`.
    #[must_use]
    pub fn new(catalog: Vec<Offer>, outcome: SandboxOutcome, clock: Arc<dyn Clock>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            catalog,
            outcome,
            clock,
            next_id: AtomicU64::new(1),
            ledger: Mutex::new(Ledger::default()),
            updates,
        }
    }

    fn issue_transaction(&self, offer: &Offer) -> Transaction {
        Transaction {
            id: TransactionId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            product_id: offer.product_id.clone(),
            purchased_at: self.clock.now(),
        }
    }
}

#[async_trait]
impl Storefront for SandboxStorefront {
    async fn products(&self, product_ids: &[String]) -> Result<Vec<Offer>, StoreError> {
        Ok(self
            .catalog
            .iter()
            .filter(|offer| product_ids.contains(&offer.product_id))
            .cloned()
            .collect())
    }

    async fn purchase(&self, offer: &Offer) -> Result<StorePurchaseResult, StoreError> {
        debug!(product_id = %offer.product_id, outcome = ?self.outcome, "sandbox purchase");
        match self.outcome {
            SandboxOutcome::Success => {
                let transaction = self.issue_transaction(offer);
                self.ledger.lock().unfinished.push(transaction.clone());
                // No receivers is fine; the listener may not be running.
                let _ = self
                    .updates
                    .send(VerificationResult::Verified(transaction.clone()));
                Ok(StorePurchaseResult::Success(VerificationResult::Verified(
                    transaction,
                )))
            }
            SandboxOutcome::Cancel => Ok(StorePurchaseResult::UserCancelled),
            SandboxOutcome::Pending => Ok(StorePurchaseResult::Pending),
            SandboxOutcome::Unverified => Ok(StorePurchaseResult::Success(
                VerificationResult::Unverified(
                    self.issue_transaction(offer),
                    "sandbox signature mismatch".to_owned(),
                ),
            )),
            SandboxOutcome::Fail => Err(StoreError::Failed("sandbox purchase declined".into())),
        }
    }

    async fn finish(&self, transaction_id: TransactionId) -> Result<(), StoreError> {
        let mut ledger = self.ledger.lock();
        if ledger.entitlements.iter().any(|t| t.id == transaction_id) {
            return Ok(());
        }
        let position = ledger
            .unfinished
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| StoreError::Failed(format!("unknown transaction {transaction_id}")))?;
        let transaction = ledger.unfinished.remove(position);
        ledger.entitlements.push(transaction);
        Ok(())
    }

    async fn current_entitlements(
        &self,
    ) -> Result<Vec<VerificationResult<Transaction>>, StoreError> {
        Ok(self
            .ledger
            .lock()
            .entitlements
            .iter()
            .cloned()
            .map(VerificationResult::Verified)
            .collect())
    }

    fn transaction_updates(&self) -> TransactionUpdates {
        stream::unfold(self.updates.subscribe(), |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(update) => return Some((update, rx)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "transaction update stream lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use onboarding_core::store::{StorePurchaseResult, Storefront, VerificationResult};
    use onboarding_test_support::{FixedClock, WEEKLY_PRODUCT_ID, fixed_now, weekly_offer};

    use super::{SandboxOutcome, SandboxStorefront};
    use crate::service::{PurchaseOutcome, SubscriptionService};

    fn sandbox(outcome: SandboxOutcome) -> Arc<SandboxStorefront> {
        Arc::new(SandboxStorefront::new(
            vec![weekly_offer()],
            outcome,
            Arc::new(FixedClock(fixed_now())),
        ))
    }

    #[test]
    fn test_outcome_parses_case_insensitively() {
        assert_eq!(
            "Success".parse::<SandboxOutcome>().unwrap(),
            SandboxOutcome::Success
        );
        assert_eq!(
            " cancel ".parse::<SandboxOutcome>().unwrap(),
            SandboxOutcome::Cancel
        );
        assert_eq!(
            "UNVERIFIED".parse::<SandboxOutcome>().unwrap(),
            SandboxOutcome::Unverified
        );
        assert!("refund".parse::<SandboxOutcome>().is_err());
    }

    #[tokio::test]
    async fn test_successful_purchase_becomes_entitlement_after_finalize() {
        // Arrange
        let storefront = sandbox(SandboxOutcome::Success);
        let service = SubscriptionService::new(storefront.clone(), WEEKLY_PRODUCT_ID);
        let offer = service.load_offer().await.unwrap();

        // Act
        let outcome = service.purchase(&offer).await.unwrap();

        // Assert
        match outcome {
            PurchaseOutcome::Purchased(transaction) => {
                assert_eq!(transaction.purchased_at, fixed_now());
                assert_eq!(transaction.product_id, WEEKLY_PRODUCT_ID);
            }
            other => panic!("expected Purchased, got {other:?}"),
        }
        assert!(service.has_active_subscription().await);
    }

    #[tokio::test]
    async fn test_successful_purchase_is_echoed_on_update_stream() {
        use futures_util::StreamExt;

        let storefront = sandbox(SandboxOutcome::Success);
        let mut updates = storefront.transaction_updates();

        let result = storefront.purchase(&weekly_offer()).await.unwrap();
        let echoed = updates.next().await.unwrap();

        match result {
            StorePurchaseResult::Success(verification) => assert_eq!(verification, echoed),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_finish_of_unknown_transaction_fails() {
        let storefront = sandbox(SandboxOutcome::Success);

        let result = storefront
            .finish(onboarding_core::store::TransactionId(99))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unverified_outcome_is_not_entitled() {
        let storefront = sandbox(SandboxOutcome::Unverified);

        let result = storefront.purchase(&weekly_offer()).await.unwrap();

        assert!(matches!(
            result,
            StorePurchaseResult::Success(VerificationResult::Unverified(_, _))
        ));
        assert!(storefront.current_entitlements().await.unwrap().is_empty());
    }
}
