//! Presenter for a single question step.

use std::sync::{Arc, Weak};

use onboarding_core::question::Question;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::application::signal::AdvanceSignal;
use crate::error::AnswerOutOfRange;
use crate::view::QuestionView;

/// Holds the answer selection for one question and signals advance once the
/// user confirms it.
///
/// The selection lives only as long as this presenter; nothing is persisted
/// or submitted.
#[derive(Debug)]
pub struct QuestionPresenter {
    question: Arc<Question>,
    view: Mutex<Option<Weak<dyn QuestionView>>>,
    selected: Mutex<Option<usize>>,
    signal: AdvanceSignal,
}

impl QuestionPresenter {
    /// Create a presenter for `question` that resolves `signal` on confirm.
    #[must_use]
    pub fn new(question: Arc<Question>, signal: AdvanceSignal) -> Self {
        Self {
            question,
            view: Mutex::new(None),
            selected: Mutex::new(None),
            signal,
        }
    }

    /// Attaches the view without taking ownership of it.
    pub fn attach_view<V: QuestionView + 'static>(&self, view: &Arc<V>) {
        let weak: Weak<dyn QuestionView> = Arc::downgrade(view) as Weak<V>;
        *self.view.lock() = Some(weak);
    }

    /// Initial render: nothing selected, continue disabled.
    pub fn view_did_load(&self) {
        if let Some(view) = self.view() {
            view.update_continue_button(false);
            view.reload_answers();
        }
    }

    /// Records `index` as the single selected answer, replacing any earlier
    /// choice.
    ///
    /// # Errors
    ///
    /// Returns `AnswerOutOfRange` if `index` is not a valid answer position;
    /// the previous selection is kept.
    pub fn select_answer(&self, index: usize) -> Result<(), AnswerOutOfRange> {
        let count = self.question.answer_count();
        if index >= count {
            return Err(AnswerOutOfRange { index, count });
        }

        *self.selected.lock() = Some(index);

        if let Some(view) = self.view() {
            view.update_continue_button(true);
            view.reload_answers();
        }
        Ok(())
    }

    /// Confirms the current selection and signals advance.
    ///
    /// Returns `true` only for the call that actually emitted the signal.
    /// Without a selection this is a no-op.
    pub fn confirm(&self) -> bool {
        let Some(answer) = self.selected_index() else {
            debug!(question_id = self.question.id, "confirm ignored, nothing selected");
            return false;
        };

        match self.signal.resolve() {
            Ok(()) => {
                info!(question_id = self.question.id, answer, "question answered");
                true
            }
            Err(error) => {
                debug!(question_id = self.question.id, %error, "confirm ignored");
                false
            }
        }
    }

    /// The currently selected answer index.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        *self.selected.lock()
    }

    /// Whether the step has already signalled advance.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.signal.is_resolved()
    }

    /// Server identifier of the question.
    #[must_use]
    pub fn question_id(&self) -> i64 {
        self.question.id
    }

    /// Prompt text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.question.prompt
    }

    /// Number of answer options.
    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.question.answer_count()
    }

    /// Answer text at `index`.
    #[must_use]
    pub fn answer_text(&self, index: usize) -> Option<&str> {
        self.question.answer(index)
    }

    fn view(&self) -> Option<Arc<dyn QuestionView>> {
        self.view.lock().as_ref().and_then(Weak::upgrade)
    }
}
