//! Flow orchestration and screen presenters.

pub mod flow;
pub mod paywall_presenter;
pub mod question_presenter;
pub mod signal;
