//! Subscription service: offer lookup, purchase, idempotent finalization.

use std::collections::HashMap;
use std::sync::Arc;

use onboarding_core::error::{OfferError, PurchaseError, StoreError};
use onboarding_core::store::{
    Offer, StorePurchaseResult, Storefront, Transaction, TransactionId, TransactionUpdates,
    VerificationResult,
};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// The weekly premium subscription tracked by default.
pub const DEFAULT_PRODUCT_ID: &str = "com.ivanpetrov.OnboardingApp.weekly_premium";

/// Result of a purchase attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The purchase completed and its transaction was finalized.
    Purchased(Transaction),
    /// The user dismissed the purchase sheet.
    Cancelled,
    /// The purchase awaits external approval.
    Pending,
}

impl PurchaseOutcome {
    /// Whether the user now owns the product.
    #[must_use]
    pub fn is_purchased(&self) -> bool {
        matches!(self, Self::Purchased(_))
    }
}

/// Wraps a [`Storefront`] around the single tracked subscription product.
pub struct SubscriptionService {
    storefront: Arc<dyn Storefront>,
    product_id: String,
    acknowledgements: Mutex<HashMap<TransactionId, Arc<OnceCell<()>>>>,
}

impl std::fmt::Debug for SubscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService")
            .field("product_id", &self.product_id)
            .field("finalized", &self.finalized_count())
            .finish_non_exhaustive()
    }
}

impl SubscriptionService {
    /// Create a service tracking `product_id`.
    #[must_use]
    pub fn new(storefront: Arc<dyn Storefront>, product_id: impl Into<String>) -> Self {
        Self {
            storefront,
            product_id: product_id.into(),
            acknowledgements: Mutex::new(HashMap::new()),
        }
    }

    /// The tracked product identifier.
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Resolves the tracked product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `OfferError::ProductNotFound` if the catalog has no entry for
    /// the tracked product, or `OfferError::Store` if the lookup fails.
    pub async fn load_offer(&self) -> Result<Offer, OfferError> {
        let offers = self
            .storefront
            .products(std::slice::from_ref(&self.product_id))
            .await?;

        let offer = offers
            .into_iter()
            .find(|offer| offer.product_id == self.product_id)
            .ok_or_else(|| OfferError::ProductNotFound(self.product_id.clone()))?;

        debug!(product_id = %offer.product_id, price = %offer.display_price, "resolved offer");
        Ok(offer)
    }

    /// Purchases `offer`.
    ///
    /// A verified transaction is finalized before returning. Cancellation and
    /// pending approval are neutral outcomes, not errors.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::UnverifiedTransaction` if the resulting
    /// transaction fails verification, or `PurchaseError::Store` for any
    /// other storefront failure.
    pub async fn purchase(&self, offer: &Offer) -> Result<PurchaseOutcome, PurchaseError> {
        info!(product_id = %offer.product_id, "starting purchase");

        match self.storefront.purchase(offer).await? {
            StorePurchaseResult::Success(verification) => {
                let transaction = check_verified(verification)?;
                self.finalize(&transaction).await?;
                info!(transaction_id = %transaction.id, "purchase completed");
                Ok(PurchaseOutcome::Purchased(transaction))
            }
            StorePurchaseResult::UserCancelled => {
                info!("purchase cancelled by user");
                Ok(PurchaseOutcome::Cancelled)
            }
            StorePurchaseResult::Pending => {
                info!("purchase pending external action");
                Ok(PurchaseOutcome::Pending)
            }
        }
    }

    /// Acknowledges `transaction` with the storefront.
    ///
    /// Finalizing an already finalized transaction is a no-op that succeeds.
    /// A caller arriving while another acknowledgement of the same
    /// transaction is in flight waits for it; if that one fails, the waiting
    /// caller retries. `Ok` is only returned once `finish` has succeeded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storefront rejects the acknowledgement.
    pub async fn finalize(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let acknowledgement = self
            .acknowledgements
            .lock()
            .entry(transaction.id)
            .or_default()
            .clone();

        if acknowledgement.initialized() {
            debug!(transaction_id = %transaction.id, "transaction already finalized");
            return Ok(());
        }

        acknowledgement
            .get_or_try_init(|| async {
                self.storefront.finish(transaction.id).await?;
                debug!(transaction_id = %transaction.id, "transaction finalized");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }

    /// Whether a verified entitlement for the tracked product exists.
    ///
    /// Storefront failures are logged and reported as "no subscription".
    pub async fn has_active_subscription(&self) -> bool {
        match self.storefront.current_entitlements().await {
            Ok(entitlements) => entitlements.iter().any(|entitlement| {
                entitlement.is_verified() && entitlement.payload().product_id == self.product_id
            }),
            Err(error) => {
                warn!(%error, "failed to list entitlements");
                false
            }
        }
    }

    /// Re-checks every current entitlement and finalizes the verified ones
    /// for the tracked product.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::UnverifiedTransaction` on the first entitlement
    /// that fails verification, or `PurchaseError::Store` if listing or
    /// finalizing fails.
    pub async fn restore(&self) -> Result<(), PurchaseError> {
        let entitlements = self.storefront.current_entitlements().await?;
        for entitlement in entitlements {
            let transaction = check_verified(entitlement)?;
            if transaction.product_id == self.product_id {
                self.finalize(&transaction).await?;
            }
        }
        info!("restored purchases");
        Ok(())
    }

    /// Processes one update from the platform's transaction stream.
    ///
    /// Updates for other products are ignored.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError` if the update fails verification or cannot be
    /// finalized.
    pub async fn handle_transaction_update(
        &self,
        update: VerificationResult<Transaction>,
    ) -> Result<(), PurchaseError> {
        if update.payload().product_id != self.product_id {
            debug!(
                product_id = %update.payload().product_id,
                "ignoring update for untracked product"
            );
            return Ok(());
        }
        let transaction = check_verified(update)?;
        self.finalize(&transaction).await?;
        Ok(())
    }

    fn finalized_count(&self) -> usize {
        self.acknowledgements
            .lock()
            .values()
            .filter(|acknowledgement| acknowledgement.initialized())
            .count()
    }

    /// Subscribes to the storefront's transaction update stream.
    #[must_use]
    pub fn transaction_updates(&self) -> TransactionUpdates {
        self.storefront.transaction_updates()
    }
}

fn check_verified(
    verification: VerificationResult<Transaction>,
) -> Result<Transaction, PurchaseError> {
    match verification {
        VerificationResult::Verified(transaction) => Ok(transaction),
        VerificationResult::Unverified(transaction, reason) => {
            warn!(transaction_id = %transaction.id, %reason, "unverified transaction");
            Err(PurchaseError::UnverifiedTransaction {
                transaction_id: transaction.id,
                reason,
            })
        }
    }
}
