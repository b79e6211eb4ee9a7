//! Onboarding Core: shared model, ports and errors.
//!
//! This crate defines the types and traits that the loader, the purchase
//! wrapper and the flow sequencer agree on. It contains no infrastructure
//! code.

pub mod clock;
pub mod error;
pub mod fetcher;
pub mod question;
pub mod store;
