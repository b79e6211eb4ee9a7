//! Onboarding Flow: sequences the questionnaire and the paywall.
//!
//! The flow loads the questions, turns them into an ordered list of steps
//! with a trailing paywall, and presents one step at a time, suspending
//! until the active step signals that the user is done with it.

pub mod application;
pub mod domain;
pub mod error;
pub mod view;

pub use application::flow::{FlowOutcome, FlowReport, OnboardingFlow};
pub use application::paywall_presenter::PaywallPresenter;
pub use application::question_presenter::QuestionPresenter;
pub use domain::legal::LegalLink;
pub use domain::state::{Advance, FlowPhase, FlowState};
pub use domain::steps::{Step, build_steps};
pub use view::{Navigator, PaywallView, QuestionView};
