//! Shared helpers for flow integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use onboarding_core::fetcher::QuestionFetcher;
use onboarding_flow::{
    FlowReport, LegalLink, Navigator, OnboardingFlow, PaywallPresenter, PaywallView,
    QuestionPresenter, QuestionView,
};
use onboarding_purchase::SubscriptionService;
use onboarding_test_support::{ScriptedStorefront, WEEKLY_PRODUCT_ID};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A screen handed to the navigator.
pub enum Screen {
    Question(Arc<QuestionPresenter>),
    Paywall(Arc<PaywallPresenter>),
}

/// Navigator that forwards every shown screen to the test.
#[derive(Debug)]
pub struct ChannelNavigator {
    screens: mpsc::UnboundedSender<Screen>,
    dismissals: AtomicUsize,
}

impl ChannelNavigator {
    /// Number of `dismiss` calls.
    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

impl Navigator for ChannelNavigator {
    fn show_question(&self, presenter: Arc<QuestionPresenter>) {
        self.screens.send(Screen::Question(presenter)).ok();
    }

    fn show_paywall(&self, presenter: Arc<PaywallPresenter>) {
        self.screens.send(Screen::Paywall(presenter)).ok();
    }

    fn dismiss(&self) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Question view that records continue-button states.
#[derive(Debug, Default)]
pub struct RecordingQuestionView {
    pub continue_enabled: Mutex<Vec<bool>>,
}

impl QuestionView for RecordingQuestionView {
    fn update_continue_button(&self, enabled: bool) {
        self.continue_enabled.lock().push(enabled);
    }

    fn reload_answers(&self) {}
}

/// Paywall view that records purchase-button states and errors.
#[derive(Debug, Default)]
pub struct RecordingPaywallView {
    pub purchase_enabled: Mutex<Vec<bool>>,
    pub errors: Mutex<Vec<String>>,
    pub links: Mutex<Vec<LegalLink>>,
}

impl PaywallView for RecordingPaywallView {
    fn set_loading(&self, _loading: bool) {}

    fn set_purchase_enabled(&self, enabled: bool) {
        self.purchase_enabled.lock().push(enabled);
    }

    fn update_price_text(&self, _price: &str) {}

    fn show_error(&self, message: &str) {
        self.errors.lock().push(message.to_owned());
    }

    fn open_link(&self, link: LegalLink) {
        self.links.lock().push(link);
    }
}

/// A flow under test with its moving parts exposed.
pub struct Harness {
    pub flow: Arc<OnboardingFlow>,
    pub navigator: Arc<ChannelNavigator>,
    pub storefront: Arc<ScriptedStorefront>,
    pub screens: mpsc::UnboundedReceiver<Screen>,
}

impl Harness {
    pub fn new(fetcher: Arc<dyn QuestionFetcher>, storefront: ScriptedStorefront) -> Self {
        let (tx, screens) = mpsc::unbounded_channel();
        let navigator = Arc::new(ChannelNavigator {
            screens: tx,
            dismissals: AtomicUsize::new(0),
        });
        let storefront = Arc::new(storefront);
        let subscriptions = Arc::new(SubscriptionService::new(
            storefront.clone(),
            WEEKLY_PRODUCT_ID,
        ));
        let flow = Arc::new(OnboardingFlow::new(
            fetcher,
            subscriptions,
            navigator.clone(),
        ));
        Self {
            flow,
            navigator,
            storefront,
            screens,
        }
    }

    /// Start the flow on its own task.
    pub fn spawn(&self) -> JoinHandle<FlowReport> {
        let flow = Arc::clone(&self.flow);
        tokio::spawn(async move { flow.run().await })
    }

    /// Wait for the next shown screen.
    pub async fn next_screen(&mut self) -> Screen {
        tokio::time::timeout(Duration::from_secs(5), self.screens.recv())
            .await
            .expect("timed out waiting for a screen")
            .expect("navigator channel closed")
    }

    pub async fn next_question(&mut self) -> Arc<QuestionPresenter> {
        match self.next_screen().await {
            Screen::Question(presenter) => presenter,
            Screen::Paywall(_) => panic!("expected a question screen, got the paywall"),
        }
    }

    pub async fn next_paywall(&mut self) -> Arc<PaywallPresenter> {
        match self.next_screen().await {
            Screen::Paywall(presenter) => presenter,
            Screen::Question(_) => panic!("expected the paywall, got a question screen"),
        }
    }
}

/// Wait for the flow task to return.
pub async fn finish(runner: JoinHandle<FlowReport>) -> FlowReport {
    tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .expect("flow did not finish")
        .expect("flow task panicked")
}
