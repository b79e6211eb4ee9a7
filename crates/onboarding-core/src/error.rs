//! Error taxonomy for the onboarding crates.

use thiserror::Error;

use crate::store::TransactionId;

/// Boxed error carried as the source of transport and decoding failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to load the onboarding questions.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// The server answered with a status outside `200..300`.
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),

    /// The body could not be decoded into the expected shape.
    #[error("failed to decode questions payload: {0}")]
    Decode(#[source] BoxError),
}

/// Raw failure reported by the platform storefront.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The storefront could not be reached.
    #[error("storefront unavailable: {0}")]
    Unavailable(String),

    /// The storefront rejected the request.
    #[error("storefront request failed: {0}")]
    Failed(String),
}

/// Failure to resolve the subscription offer.
#[derive(Debug, Error)]
pub enum OfferError {
    /// The catalog lookup returned nothing for the tracked product.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The catalog lookup itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure while purchasing or finalizing a transaction.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The platform could not vouch for the transaction.
    #[error("transaction {transaction_id} failed verification: {reason}")]
    UnverifiedTransaction {
        /// The rejected transaction.
        transaction_id: TransactionId,
        /// Reason reported by the verifier.
        reason: String,
    },

    /// Any other storefront failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to resolve a single-shot signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The signal was already resolved once.
    #[error("signal already resolved")]
    AlreadyResolved,
}
