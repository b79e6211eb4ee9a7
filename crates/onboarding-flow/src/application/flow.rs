//! The onboarding flow sequencer.

use std::sync::Arc;

use onboarding_core::fetcher::QuestionFetcher;
use onboarding_purchase::SubscriptionService;
use tokio::sync::watch;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::application::paywall_presenter::PaywallPresenter;
use crate::application::question_presenter::QuestionPresenter;
use crate::application::signal::{AdvanceSignal, advance_channel};
use crate::domain::state::{Advance, FlowPhase, FlowState};
use crate::domain::steps::{Step, build_steps};
use crate::view::Navigator;

/// How a flow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Every step, including the paywall, signalled advance.
    Completed,
    /// The questions could not be loaded; no screen was shown.
    LoadFailed,
    /// A step was torn down without signalling advance.
    Interrupted,
}

/// Summary of a finished flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowReport {
    /// Correlation id of the run, also recorded on its tracing span.
    pub run_id: Uuid,
    /// Number of steps handed to the navigator.
    pub steps_presented: usize,
    /// How the run ended.
    pub outcome: FlowOutcome,
}

/// Walks the onboarding steps one at a time.
///
/// Each run fetches the questions, builds the step list, and for every step
/// hands a fresh presenter to the navigator and suspends until that
/// presenter signals advance. Only one step is active at a time.
pub struct OnboardingFlow {
    fetcher: Arc<dyn QuestionFetcher>,
    subscriptions: Arc<SubscriptionService>,
    navigator: Arc<dyn Navigator>,
    phase: watch::Sender<FlowPhase>,
}

impl std::fmt::Debug for OnboardingFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingFlow")
            .field("phase", &*self.phase.borrow())
            .finish_non_exhaustive()
    }
}

impl OnboardingFlow {
    /// Create a flow over the given collaborators.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn QuestionFetcher>,
        subscriptions: Arc<SubscriptionService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (phase, _) = watch::channel(FlowPhase::Loading);
        Self {
            fetcher,
            subscriptions,
            navigator,
            phase,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        *self.phase.borrow()
    }

    /// Runs the flow to completion and dismisses the presented screens.
    ///
    /// Screens are dismissed after a completed or interrupted run. A load
    /// failure is logged and ends the run without showing or dismissing
    /// anything; it is reported only as [`FlowOutcome::LoadFailed`].
    pub async fn run(&self) -> FlowReport {
        let run_id = Uuid::new_v4();
        self.execute(run_id)
            .instrument(info_span!("onboarding_flow", %run_id))
            .await
    }

    async fn execute(&self, run_id: Uuid) -> FlowReport {
        self.phase.send_replace(FlowPhase::Loading);

        let questions = match self.fetcher.fetch_questions().await {
            Ok(questions) => questions,
            Err(error) => {
                error!(%error, "failed to load onboarding");
                self.phase.send_replace(FlowPhase::Finished);
                return FlowReport {
                    run_id,
                    steps_presented: 0,
                    outcome: FlowOutcome::LoadFailed,
                };
            }
        };

        let steps = build_steps(questions);
        info!(step_count = steps.len(), "onboarding started");

        let mut steps_presented = 0;
        let outcome = match FlowState::start(steps.len()) {
            Some(mut state) => loop {
                let step = &steps[state.index()];
                self.phase.send_replace(FlowPhase::Presenting(state.index()));

                let (signal, waiter) = advance_channel();
                self.present(step, signal);
                steps_presented += 1;

                if waiter.wait().await.is_err() {
                    warn!(
                        step_index = state.index(),
                        step = step.kind(),
                        "step closed without advancing"
                    );
                    break FlowOutcome::Interrupted;
                }

                match state.advance() {
                    Advance::Next(next) => state = next,
                    Advance::Finished => break FlowOutcome::Completed,
                }
            },
            None => FlowOutcome::Completed,
        };

        self.navigator.dismiss();
        self.phase.send_replace(FlowPhase::Finished);
        info!(steps_presented, ?outcome, "onboarding finished");

        FlowReport {
            run_id,
            steps_presented,
            outcome,
        }
    }

    fn present(&self, step: &Step, signal: AdvanceSignal) {
        match step {
            Step::Question(question) => {
                let presenter = QuestionPresenter::new(Arc::clone(question), signal);
                self.navigator.show_question(Arc::new(presenter));
            }
            Step::Paywall => {
                let presenter = PaywallPresenter::new(Arc::clone(&self.subscriptions), signal);
                self.navigator.show_paywall(Arc::new(presenter));
            }
        }
    }
}
