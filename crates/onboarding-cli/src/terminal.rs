//! Terminal rendering of the onboarding screens.
//!
//! The flow runs on one task and hands screens to [`TerminalNavigator`]; a
//! second task owns stdin and drives whichever screen is current.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use onboarding_flow::{
    LegalLink, Navigator, PaywallPresenter, PaywallView, QuestionPresenter, QuestionView,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A screen to show, or the end of the sequence.
#[derive(Debug)]
pub enum Screen {
    /// A question screen.
    Question(Arc<QuestionPresenter>),
    /// The paywall.
    Paywall(Arc<PaywallPresenter>),
    /// The sequence was dismissed.
    Dismissed,
}

/// Navigator that forwards screens to the terminal task.
#[derive(Debug)]
pub struct TerminalNavigator {
    screens: mpsc::UnboundedSender<Screen>,
}

impl TerminalNavigator {
    /// Create a navigator and the receiver the terminal task reads from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Screen>) {
        let (screens, rx) = mpsc::unbounded_channel();
        (Self { screens }, rx)
    }

    fn send(&self, screen: Screen) {
        if self.screens.send(screen).is_err() {
            debug!("terminal task is gone, screen dropped");
        }
    }
}

impl Navigator for TerminalNavigator {
    fn show_question(&self, presenter: Arc<QuestionPresenter>) {
        self.send(Screen::Question(presenter));
    }

    fn show_paywall(&self, presenter: Arc<PaywallPresenter>) {
        self.send(Screen::Paywall(presenter));
    }

    fn dismiss(&self) {
        self.send(Screen::Dismissed);
    }
}

struct TerminalQuestionView {
    presenter: Arc<QuestionPresenter>,
    continue_enabled: AtomicBool,
}

impl QuestionView for TerminalQuestionView {
    fn update_continue_button(&self, enabled: bool) {
        self.continue_enabled.store(enabled, Ordering::Relaxed);
    }

    fn reload_answers(&self) {
        println!();
        println!("Let's setup App for you");
        println!("{}", self.presenter.title());
        let selected = self.presenter.selected_index();
        for index in 0..self.presenter.answer_count() {
            let mark = if selected == Some(index) { "x" } else { " " };
            let text = self.presenter.answer_text(index).unwrap_or_default();
            println!("  [{mark}] {}. {text}", index + 1);
        }
        if self.continue_enabled.load(Ordering::Relaxed) {
            println!("Pick another number, or press Enter to continue.");
        } else {
            println!("Pick an answer by number.");
        }
    }
}

struct TerminalPaywallView {
    purchase_enabled: AtomicBool,
}

impl PaywallView for TerminalPaywallView {
    fn set_loading(&self, loading: bool) {
        if loading {
            println!("Loading...");
        }
    }

    fn set_purchase_enabled(&self, enabled: bool) {
        self.purchase_enabled.store(enabled, Ordering::Relaxed);
    }

    fn update_price_text(&self, price: &str) {
        println!("Try 7 days for free");
        println!("then {price} per week, auto-renewable");
    }

    fn show_error(&self, message: &str) {
        println!("Error: {message}");
    }

    fn open_link(&self, link: LegalLink) {
        println!("Opening {}: {}", link.title(), link.url());
    }
}

/// Prints the welcome screen and waits for Enter. Returns `false` if input
/// ended first.
///
/// # Errors
///
/// Returns an I/O error if reading stdin fails.
pub async fn welcome<R>(lines: &mut Lines<R>) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    println!("Welcome!");
    println!("Press Enter to start.");
    Ok(lines.next_line().await?.is_some())
}

/// Drives screens until the sequence is dismissed, the navigator goes away,
/// or input ends.
pub async fn run_screens<R>(mut screens: mpsc::UnboundedReceiver<Screen>, mut lines: Lines<R>)
where
    R: AsyncBufRead + Unpin,
{
    while let Some(screen) = screens.recv().await {
        let result = match screen {
            Screen::Question(presenter) => question_screen(presenter, &mut lines).await,
            Screen::Paywall(presenter) => paywall_screen(presenter, &mut lines).await,
            Screen::Dismissed => break,
        };
        match result {
            Ok(true) => {}
            Ok(false) => {
                debug!("input ended, closing screens");
                break;
            }
            Err(error) => {
                warn!(%error, "failed to read input");
                break;
            }
        }
    }
}

async fn question_screen<R>(
    presenter: Arc<QuestionPresenter>,
    lines: &mut Lines<R>,
) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let view = Arc::new(TerminalQuestionView {
        presenter: Arc::clone(&presenter),
        continue_enabled: AtomicBool::new(false),
    });
    presenter.attach_view(&view);
    presenter.view_did_load();

    while !presenter.is_finished() {
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        let input = line.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("c") {
            if !presenter.confirm() {
                println!("Select an answer first.");
            }
            continue;
        }
        match input.parse::<usize>() {
            Ok(number) if number > 0 => {
                if let Err(error) = presenter.select_answer(number - 1) {
                    println!("{error}");
                }
            }
            _ => println!("Type an answer number, or press Enter to continue."),
        }
    }
    Ok(true)
}

async fn paywall_screen<R>(
    presenter: Arc<PaywallPresenter>,
    lines: &mut Lines<R>,
) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let view = Arc::new(TerminalPaywallView {
        purchase_enabled: AtomicBool::new(false),
    });
    presenter.attach_view(&view);

    println!();
    println!("Discover all Premium features");
    presenter.view_did_load().await;
    print_paywall_help();

    while !presenter.is_finished() {
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "buy" | "b" => {
                if view.purchase_enabled.load(Ordering::Relaxed) {
                    presenter.did_tap_buy().await;
                } else {
                    println!("Purchasing is not available right now.");
                }
            }
            "close" | "x" => presenter.did_tap_close(),
            command => match link_for(command) {
                Some(link) => presenter.did_tap_link(link),
                None => print_paywall_help(),
            },
        }
    }
    Ok(true)
}

fn print_paywall_help() {
    println!("Commands: buy, close");
    for link in LegalLink::ALL {
        println!("  {:<13} {}", link_command(link), link.title());
    }
}

fn link_command(link: LegalLink) -> &'static str {
    match link {
        LegalLink::TermsOfUse => "terms",
        LegalLink::PrivacyPolicy => "privacy",
        LegalLink::SubscriptionTerms => "subscription",
    }
}

fn link_for(command: &str) -> Option<LegalLink> {
    LegalLink::ALL
        .into_iter()
        .find(|link| link_command(*link) == command)
}
