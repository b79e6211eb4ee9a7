//! Ports implemented by the presentation layer.
//!
//! Presenters hold views through weak references and check them before every
//! dispatch, so a view that has been torn down is simply skipped.

use std::sync::Arc;

use crate::application::paywall_presenter::PaywallPresenter;
use crate::application::question_presenter::QuestionPresenter;
use crate::domain::legal::LegalLink;

/// Screen showing one question and its answer options.
pub trait QuestionView: Send + Sync {
    /// Enables or disables the continue control.
    fn update_continue_button(&self, enabled: bool);

    /// Re-renders the answer list, including the selection highlight.
    fn reload_answers(&self);
}

/// Screen offering the subscription.
pub trait PaywallView: Send + Sync {
    /// Shows or hides the busy state.
    fn set_loading(&self, loading: bool);

    /// Enables or disables the purchase control.
    fn set_purchase_enabled(&self, enabled: bool);

    /// Replaces the price shown in the offer description.
    fn update_price_text(&self, price: &str);

    /// Shows a generic error message with no retry affordance.
    fn show_error(&self, message: &str);

    /// Opens a legal document in an embedded browser.
    fn open_link(&self, link: LegalLink);
}

/// Owner of the presented screen stack.
///
/// The flow hands each step's presenter to the navigator, which builds the
/// matching view, attaches it and shows it in place of the previous one.
pub trait Navigator: Send + Sync {
    /// Shows a question screen.
    fn show_question(&self, presenter: Arc<QuestionPresenter>);

    /// Shows the paywall screen.
    fn show_paywall(&self, presenter: Arc<PaywallPresenter>);

    /// Dismisses the whole presented sequence.
    fn dismiss(&self);
}
