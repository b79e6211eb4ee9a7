//! Steps of an onboarding run.

use std::sync::Arc;

use onboarding_core::question::Question;

/// One screen-unit of the onboarding sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A multiple-choice question.
    Question(Arc<Question>),
    /// The subscription paywall. Always the last step.
    Paywall,
}

impl Step {
    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Question(_) => "question",
            Self::Paywall => "paywall",
        }
    }
}

/// Builds the step list for one run: one step per question in server order,
/// followed by the paywall. The result is never empty.
#[must_use]
pub fn build_steps(questions: Vec<Question>) -> Vec<Step> {
    questions
        .into_iter()
        .map(|question| Step::Question(Arc::new(question)))
        .chain(std::iter::once(Step::Paywall))
        .collect()
}

#[cfg(test)]
mod tests {
    use onboarding_test_support::sample_questions;

    use super::*;

    #[test]
    fn test_build_steps_appends_paywall_after_questions() {
        for count in [1, 2, 3, 10] {
            // Arrange
            let questions = sample_questions(count);

            // Act
            let steps = build_steps(questions.clone());

            // Assert
            assert_eq!(steps.len(), count + 1);
            assert_eq!(steps.last(), Some(&Step::Paywall));
            for (step, question) in steps.iter().zip(&questions) {
                match step {
                    Step::Question(q) => assert_eq!(q.as_ref(), question),
                    Step::Paywall => panic!("paywall before the last position"),
                }
            }
        }
    }

    #[test]
    fn test_build_steps_without_questions_is_just_the_paywall() {
        let steps = build_steps(Vec::new());

        assert_eq!(steps, vec![Step::Paywall]);
    }

    #[test]
    fn test_step_kind_labels() {
        let steps = build_steps(sample_questions(1));

        assert_eq!(steps[0].kind(), "question");
        assert_eq!(steps[1].kind(), "paywall");
    }
}
