//! Platform storefront port.
//!
//! Mirrors the shape of an in-app purchase API: a product catalog, a purchase
//! call that yields a signed transaction, an acknowledgement call, and a
//! stream of transaction updates pushed independently of explicit purchases.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Platform-assigned transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable subscription product resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Catalog product identifier.
    pub product_id: String,
    /// Localized product name.
    pub display_name: String,
    /// Localized price string, e.g. `$6.99`.
    pub display_price: String,
}

/// A completed purchase of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Product this transaction grants.
    pub product_id: String,
    /// When the purchase completed.
    pub purchased_at: DateTime<Utc>,
}

/// A platform payload together with the outcome of its signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult<T> {
    /// The signature checked out.
    Verified(T),
    /// The signature did not check out; carries the verifier's reason.
    Unverified(T, String),
}

impl<T> VerificationResult<T> {
    /// Returns the payload regardless of verification.
    #[must_use]
    pub fn payload(&self) -> &T {
        match self {
            Self::Verified(value) | Self::Unverified(value, _) => value,
        }
    }

    /// Whether the payload passed verification.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

/// Raw result of a platform purchase call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorePurchaseResult {
    /// The purchase went through and produced a signed transaction.
    Success(VerificationResult<Transaction>),
    /// The user dismissed the purchase sheet.
    UserCancelled,
    /// The purchase awaits external action (e.g. parental approval).
    Pending,
}

/// Stream of transaction updates pushed by the platform.
pub type TransactionUpdates = BoxStream<'static, VerificationResult<Transaction>>;

/// Abstraction over the platform in-app purchase API.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Resolves catalog entries for the given product identifiers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be queried.
    async fn products(&self, product_ids: &[String]) -> Result<Vec<Offer>, StoreError>;

    /// Starts a purchase for `offer`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the platform rejects the purchase.
    async fn purchase(&self, offer: &Offer) -> Result<StorePurchaseResult, StoreError>;

    /// Acknowledges a delivered transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the acknowledgement cannot be recorded.
    async fn finish(&self, transaction_id: TransactionId) -> Result<(), StoreError>;

    /// Returns the transactions that currently grant entitlements.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if entitlements cannot be listed.
    async fn current_entitlements(
        &self,
    ) -> Result<Vec<VerificationResult<Transaction>>, StoreError>;

    /// Subscribes to transaction updates. The stream ends when the platform
    /// stops delivering updates.
    fn transaction_updates(&self) -> TransactionUpdates;
}
