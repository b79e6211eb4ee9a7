//! Errors raised by flow presenters.

use thiserror::Error;

/// An answer selection outside the question's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("answer index {index} is out of range for {count} answers")]
pub struct AnswerOutOfRange {
    /// The rejected index.
    pub index: usize,
    /// Number of answers the question has.
    pub count: usize,
}

/// The active step went away without signalling advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("advance signal dropped before it was resolved")]
pub struct SignalDropped;
