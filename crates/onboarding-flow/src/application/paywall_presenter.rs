//! Presenter for the paywall step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use onboarding_core::store::Offer;
use onboarding_purchase::SubscriptionService;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::application::signal::AdvanceSignal;
use crate::domain::legal::LegalLink;
use crate::view::PaywallView;

/// Message shown when the offer cannot be resolved.
pub const LOAD_OFFER_ERROR_MESSAGE: &str = "Failed to load subscription. Please try again.";

/// Message shown when a purchase fails.
pub const PURCHASE_ERROR_MESSAGE: &str = "Purchase failed. Please try again.";

/// Loads the subscription offer, runs purchases and ends the step on a
/// completed purchase or on close.
#[derive(Debug)]
pub struct PaywallPresenter {
    subscriptions: Arc<SubscriptionService>,
    view: Mutex<Option<Weak<dyn PaywallView>>>,
    offer: Mutex<Option<Offer>>,
    purchasing: AtomicBool,
    signal: AdvanceSignal,
}

impl PaywallPresenter {
    /// Create a presenter that resolves `signal` when the paywall is done.
    #[must_use]
    pub fn new(subscriptions: Arc<SubscriptionService>, signal: AdvanceSignal) -> Self {
        Self {
            subscriptions,
            view: Mutex::new(None),
            offer: Mutex::new(None),
            purchasing: AtomicBool::new(false),
            signal,
        }
    }

    /// Attaches the view without taking ownership of it.
    pub fn attach_view<V: PaywallView + 'static>(&self, view: &Arc<V>) {
        let weak: Weak<dyn PaywallView> = Arc::downgrade(view) as Weak<V>;
        *self.view.lock() = Some(weak);
    }

    /// Resolves the offer. Purchasing stays disabled until it is known; on
    /// failure a generic error is shown and purchasing stays disabled.
    pub async fn view_did_load(&self) {
        self.dispatch(|view| {
            view.set_purchase_enabled(false);
            view.set_loading(true);
        });

        match self.subscriptions.load_offer().await {
            Ok(offer) => {
                let price = offer.display_price.clone();
                *self.offer.lock() = Some(offer);
                self.dispatch(|view| {
                    view.set_loading(false);
                    view.set_purchase_enabled(true);
                    view.update_price_text(&price);
                });
            }
            Err(error) => {
                warn!(%error, "failed to load subscription offer");
                self.dispatch(|view| {
                    view.set_loading(false);
                    view.show_error(LOAD_OFFER_ERROR_MESSAGE);
                });
            }
        }
    }

    /// Purchases the loaded offer.
    ///
    /// Ignored while no offer is loaded or another purchase is in flight.
    /// A completed purchase ends the step; cancellation and pending approval
    /// leave the paywall up with purchasing re-enabled.
    pub async fn did_tap_buy(&self) {
        let Some(offer) = self.offer() else {
            debug!("buy ignored, offer not loaded");
            return;
        };
        if self.purchasing.swap(true, Ordering::AcqRel) {
            debug!("buy ignored, purchase already in flight");
            return;
        }

        self.dispatch(|view| {
            view.set_loading(true);
            view.set_purchase_enabled(false);
        });

        let result = self.subscriptions.purchase(&offer).await;
        self.purchasing.store(false, Ordering::Release);

        match result {
            Ok(outcome) => {
                self.dispatch(|view| {
                    view.set_loading(false);
                    view.set_purchase_enabled(true);
                });
                if outcome.is_purchased() {
                    self.finish("purchased");
                }
            }
            Err(error) => {
                warn!(%error, "purchase failed");
                self.dispatch(|view| {
                    view.set_loading(false);
                    view.set_purchase_enabled(true);
                    view.show_error(PURCHASE_ERROR_MESSAGE);
                });
            }
        }
    }

    /// Leaves the paywall without purchasing.
    pub fn did_tap_close(&self) {
        self.finish("closed");
    }

    /// Opens one of the legal documents.
    pub fn did_tap_link(&self, link: LegalLink) {
        self.dispatch(|view| view.open_link(link));
    }

    /// The resolved offer, once loaded.
    #[must_use]
    pub fn offer(&self) -> Option<Offer> {
        self.offer.lock().clone()
    }

    /// Whether the step has already signalled advance.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.signal.is_resolved()
    }

    fn finish(&self, reason: &'static str) {
        match self.signal.resolve() {
            Ok(()) => info!(reason, "paywall finished"),
            Err(error) => debug!(reason, %error, "paywall already finished"),
        }
    }

    fn dispatch(&self, f: impl FnOnce(&dyn PaywallView)) {
        let view = self.view.lock().as_ref().and_then(Weak::upgrade);
        if let Some(view) = view {
            f(view.as_ref());
        }
    }
}
