//! Sequencer position and phase.

/// Observable phase of a flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    /// Questions are being fetched.
    #[default]
    Loading,
    /// The step at this index is on screen.
    Presenting(usize),
    /// The run is over. Presented screens, if any, were dismissed.
    Finished,
}

/// Position of the sequencer within a step list.
///
/// Invariant: `index < count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowState {
    index: usize,
    count: usize,
}

/// What happens when the active step signals advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move on to the next step.
    Next(FlowState),
    /// The last step was completed.
    Finished,
}

impl FlowState {
    /// Positions the sequencer on the first of `count` steps. Returns `None`
    /// for an empty step list.
    #[must_use]
    pub fn start(count: usize) -> Option<Self> {
        (count > 0).then_some(Self { index: 0, count })
    }

    /// Index of the active step.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total number of steps.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the active step is the last one.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    /// Advances past the active step.
    #[must_use]
    pub fn advance(self) -> Advance {
        let next = self.index + 1;
        if next < self.count {
            Advance::Next(Self {
                index: next,
                count: self.count,
            })
        } else {
            Advance::Finished
        }
    }
}
