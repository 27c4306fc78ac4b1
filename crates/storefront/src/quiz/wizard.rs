//! Step-by-step quiz state.

use serde::Serialize;

use super::QuizAnswers;
use crate::catalog::{QuizQuestion, quiz_questions};

/// Tracks which question a shopper is on and what they have answered.
///
/// Answering moves to the next question, except on the last one where the
/// shopper submits instead.
#[derive(Debug, Clone)]
pub struct QuizWizard {
    questions: &'static [QuizQuestion],
    step: usize,
    answers: QuizAnswers,
}

/// Serializable snapshot of the wizard for the quiz page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: usize,
    pub total_steps: usize,
    pub progress: u32,
    pub question: Option<QuizQuestion>,
    pub selected: Option<String>,
    pub answers: QuizAnswers,
    pub can_submit: bool,
}

impl Default for QuizWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizWizard {
    /// Start at the first of the storefront's quiz questions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_questions(quiz_questions())
    }

    /// Start at the first of `questions`.
    #[must_use]
    pub fn with_questions(questions: &'static [QuizQuestion]) -> Self {
        Self {
            questions,
            step: 0,
            answers: QuizAnswers::new(),
        }
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// The question being asked.
    #[must_use]
    pub fn current_question(&self) -> Option<&'static QuizQuestion> {
        self.questions.get(self.step)
    }

    /// Answers given so far.
    #[must_use]
    pub const fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    fn is_last_step(&self) -> bool {
        self.step + 1 >= self.questions.len()
    }

    /// Answer the current question and advance unless it is the last one.
    pub fn answer(&mut self, value: &str) {
        let Some(question) = self.current_question() else {
            return;
        };

        if !question.accepts(value) {
            tracing::debug!(question_id = question.id, value, "Unrecognized quiz answer");
        }
        self.answers.set(question.id, value);

        if !self.is_last_step() {
            self.step += 1;
        }
    }

    /// Go back one question. Does nothing on the first question.
    pub const fn previous(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Percentage shown on the progress bar.
    ///
    /// Counts completed steps, and reads 100 once the last question has an answer.
    #[must_use]
    pub fn progress(&self) -> u32 {
        let total = self.questions.len();
        if total == 0 {
            return 100;
        }

        let last_answered = self
            .current_question()
            .is_some_and(|q| self.is_last_step() && self.answers.contains(q.id));
        if last_answered {
            return 100;
        }

        u32::try_from(self.step * 100 / total).unwrap_or(100)
    }

    /// Returns `true` once every question has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|q| self.answers.contains(q.id))
    }

    /// Start over: back to the first question with no answers.
    pub fn reset(&mut self) {
        self.step = 0;
        self.answers = QuizAnswers::new();
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> WizardView {
        let question = self.current_question();
        WizardView {
            step: self.step,
            total_steps: self.questions.len(),
            progress: self.progress(),
            question: question.cloned(),
            selected: question
                .and_then(|q| self.answers.get(q.id))
                .map(str::to_owned),
            answers: self.answers.clone(),
            can_submit: self.is_last_step() && self.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::question_ids;

    #[test]
    fn test_answer_advances_until_last_question() {
        let mut wizard = QuizWizard::new();
        assert_eq!(wizard.step(), 0);

        wizard.answer("oily");
        assert_eq!(wizard.step(), 1);

        wizard.answer("acne");
        assert_eq!(wizard.step(), 2);

        wizard.answer("not-sensitive");
        assert_eq!(wizard.step(), 2);
        assert!(wizard.is_complete());
    }

    #[test]
    fn test_progress() {
        let mut wizard = QuizWizard::new();
        assert_eq!(wizard.progress(), 0);

        wizard.answer("oily");
        assert_eq!(wizard.progress(), 33);

        wizard.answer("acne");
        assert_eq!(wizard.progress(), 66);

        wizard.answer("very-sensitive");
        assert_eq!(wizard.progress(), 100);
    }

    #[test]
    fn test_previous_keeps_answers_and_stops_at_first() {
        let mut wizard = QuizWizard::new();
        wizard.previous();
        assert_eq!(wizard.step(), 0);

        wizard.answer("dry");
        wizard.previous();

        assert_eq!(wizard.step(), 0);
        assert_eq!(wizard.answers().get(question_ids::SKIN_TYPE), Some("dry"));
    }

    #[test]
    fn test_reanswering_replaces_earlier_answer() {
        let mut wizard = QuizWizard::new();
        wizard.answer("dry");
        wizard.previous();
        wizard.answer("combination");

        assert_eq!(
            wizard.answers().get(question_ids::SKIN_TYPE),
            Some("combination")
        );
        assert_eq!(wizard.answers().len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut wizard = QuizWizard::new();
        wizard.answer("normal");
        wizard.answer("aging");

        wizard.reset();

        assert_eq!(wizard.step(), 0);
        assert!(wizard.answers().is_empty());
        assert!(!wizard.is_complete());
    }

    #[test]
    fn test_view_reports_selection_and_submit_readiness() {
        let mut wizard = QuizWizard::new();
        let view = wizard.view();
        assert_eq!(view.total_steps, 3);
        assert_eq!(view.question.map(|q| q.id), Some(question_ids::SKIN_TYPE));
        assert!(!view.can_submit);

        wizard.answer("normal");
        wizard.answer("acne");
        wizard.answer("not-sensitive");

        let view = wizard.view();
        assert_eq!(view.selected.as_deref(), Some("not-sensitive"));
        assert!(view.can_submit);
    }
}
