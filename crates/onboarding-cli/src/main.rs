//! Onboarding terminal app entry point.

use std::error::Error;
use std::sync::Arc;

use onboarding_core::clock::SystemClock;
use onboarding_flow::OnboardingFlow;
use onboarding_questions::HttpQuestionFetcher;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::error::AppError;
use crate::state::AppState;
use crate::terminal::TerminalNavigator;

mod config;
mod error;
mod state;
mod terminal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = AppConfig::from_env()?;

    // Initialize tracing subscriber. Logs go to stderr; stdout is the UI.
    init_tracing(config.log_format);

    tracing::info!("Starting onboarding");

    // Process-wide state: purchase wrapper and transaction listener.
    let state = AppState::start(&config, Arc::new(SystemClock));

    let fetcher = HttpQuestionFetcher::new(&config.questions).map_err(AppError::from)?;
    tracing::info!(
        endpoint = %fetcher.endpoint(),
        product_id = %config.product_id,
        sandbox_outcome = ?config.sandbox_outcome,
        "configured"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if !terminal::welcome(&mut lines).await.map_err(AppError::from)? {
        return Ok(());
    }

    // Run the flow on this task while the terminal task drives the screens.
    let (navigator, screens) = TerminalNavigator::new();
    let flow = OnboardingFlow::new(
        Arc::new(fetcher),
        Arc::clone(&state.subscriptions),
        Arc::new(navigator),
    );
    let ui = tokio::spawn(terminal::run_screens(screens, lines));

    let report = flow.run().await;
    // Dropping the flow closes the screen channel if nothing was presented.
    drop(flow);
    ui.await?;

    tracing::info!(
        run_id = %report.run_id,
        steps_presented = report.steps_presented,
        outcome = ?report.outcome,
        listener_running = state.listener.is_running(),
        "onboarding run ended"
    );

    println!();
    println!("Root Screen");
    if state.subscriptions.has_active_subscription().await {
        println!("Premium is active.");
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
