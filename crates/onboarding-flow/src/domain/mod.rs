//! Pure flow model: steps, sequencer state and paywall links.

pub mod legal;
pub mod state;
pub mod steps;
