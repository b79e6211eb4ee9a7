//! Onboarding Purchase: the weekly subscription purchase wrapper.
//!
//! Resolves the single tracked product, runs purchases, finalizes verified
//! transactions exactly once, and drains the platform's transaction update
//! stream in the background.

pub mod listener;
pub mod sandbox;
pub mod service;

pub use listener::TransactionListener;
pub use sandbox::{ParseSandboxOutcomeError, SandboxOutcome, SandboxStorefront};
pub use service::{DEFAULT_PRODUCT_ID, PurchaseOutcome, SubscriptionService};
