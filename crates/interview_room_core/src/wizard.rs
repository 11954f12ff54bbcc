//! crates/interview_room_core/src/wizard.rs
//!
//! The step-wise feedback form: welcome, one step per question, overall rating, notes.
//!
//! Steps are numbered from 1. With `N` questions there are `N + 3` steps. The wizard
//! knows nothing about rendering; the question wording comes from the injected set.

use crate::domain::{AnsweredQuestion, QuestionDefinition};
use crate::error::{CoreError, CoreResult};
use crate::questions::QuestionSet;
use std::collections::BTreeMap;

pub const UNANSWERED: &str = "No answer provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Welcome,
    /// Zero-based position in the question set.
    Question(usize),
    Rating,
    Notes,
}

/// Answers collected so far. Only wizard transitions mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackState {
    pub selected_answers: BTreeMap<String, String>,
    /// 0 means unset.
    pub overall_rating: u8,
    pub additional_notes: String,
    pub current_step_index: usize,
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self {
            selected_answers: BTreeMap::new(),
            overall_rating: 0,
            additional_notes: String::new(),
            current_step_index: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    Editing,
    Submitting,
    Succeeded,
    /// Holds the banner text of the last failed attempt.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FeedbackWizard {
    questions: QuestionSet,
    state: FeedbackState,
    phase: SubmissionPhase,
}

impl FeedbackWizard {
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            questions,
            state: FeedbackState::default(),
            phase: SubmissionPhase::Editing,
        }
    }

    pub fn question_set(&self) -> QuestionSet {
        self.questions
    }

    pub fn state(&self) -> &FeedbackState {
        &self.state
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn total_steps(&self) -> usize {
        self.questions.questions().len() + 3
    }

    pub fn current_step(&self) -> Step {
        self.step_at(self.state.current_step_index)
    }

    fn step_at(&self, index: usize) -> Step {
        let question_count = self.questions.questions().len();
        match index {
            0 | 1 => Step::Welcome,
            i if i <= question_count + 1 => Step::Question(i - 2),
            i if i == question_count + 2 => Step::Rating,
            _ => Step::Notes,
        }
    }

    pub fn is_final_step(&self) -> bool {
        self.state.current_step_index == self.total_steps()
    }

    pub fn current_question(&self) -> Option<&'static QuestionDefinition> {
        match self.current_step() {
            Step::Question(i) => self.questions.questions().get(i),
            _ => None,
        }
    }

    pub fn can_proceed(&self) -> bool {
        match self.current_step() {
            Step::Welcome | Step::Notes => true,
            Step::Question(_) => self
                .current_question()
                .and_then(|q| self.state.selected_answers.get(q.id))
                .is_some_and(|answer| !answer.is_empty()),
            Step::Rating => self.state.overall_rating > 0,
        }
    }

    /// Advances one step when the current step is complete. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if self.is_final_step() || !self.can_proceed() {
            return false;
        }
        self.state.current_step_index += 1;
        true
    }

    /// Goes back one step regardless of validation. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.state.current_step_index <= 1 {
            return false;
        }
        self.state.current_step_index -= 1;
        true
    }

    pub fn select_answer(&mut self, question_id: &str, answer: &str) -> CoreResult<()> {
        self.ensure_editable()?;
        let question = self
            .questions
            .find(question_id)
            .ok_or_else(|| CoreError::invalid(format!("unknown question '{question_id}'")))?;
        if !question.answer_choices.contains(&answer) {
            return Err(CoreError::invalid(format!(
                "'{answer}' is not an answer to '{question_id}'"
            )));
        }
        self.state
            .selected_answers
            .insert(question_id.to_string(), answer.to_string());
        Ok(())
    }

    pub fn set_rating(&mut self, rating: u8) -> CoreResult<()> {
        self.ensure_editable()?;
        if !(1..=5).contains(&rating) {
            return Err(CoreError::invalid(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        self.state.overall_rating = rating;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) -> CoreResult<()> {
        self.ensure_editable()?;
        self.state.additional_notes = notes.to_string();
        Ok(())
    }

    /// Display-only progress, `current_step / total_steps * 100`.
    pub fn progress_percent(&self) -> f64 {
        self.state.current_step_index as f64 / self.total_steps() as f64 * 100.0
    }

    pub fn step_title(&self) -> String {
        match self.current_step() {
            Step::Welcome => "Welcome".to_string(),
            Step::Question(i) => format!(
                "Question {} of {}",
                i + 1,
                self.questions.questions().len()
            ),
            Step::Rating => "Overall Rating".to_string(),
            Step::Notes => "Additional Notes".to_string(),
        }
    }

    /// Every question in set order with its answer, or `UNANSWERED`.
    pub fn answered_questions(&self) -> Vec<AnsweredQuestion> {
        self.questions
            .questions()
            .iter()
            .map(|q| AnsweredQuestion {
                question: q.prompt_text.to_string(),
                answer: self
                    .state
                    .selected_answers
                    .get(q.id)
                    .cloned()
                    .unwrap_or_else(|| UNANSWERED.to_string()),
            })
            .collect()
    }

    /// Marks a submission as in flight. Only one may be outstanding at a time, and only
    /// from the final step of a form that carries an overall rating.
    pub fn begin_submission(&mut self) -> CoreResult<()> {
        match self.phase {
            SubmissionPhase::Submitting => Err(CoreError::SubmissionInProgress),
            SubmissionPhase::Succeeded => {
                Err(CoreError::invalid("feedback has already been submitted"))
            }
            SubmissionPhase::Editing | SubmissionPhase::Failed(_) => {
                if !self.is_final_step() {
                    return Err(CoreError::invalid(
                        "feedback can only be submitted from the last step",
                    ));
                }
                if self.state.overall_rating == 0 {
                    return Err(CoreError::invalid("an overall rating is required"));
                }
                self.phase = SubmissionPhase::Submitting;
                Ok(())
            }
        }
    }

    /// Records the outcome of the attempt. Answers are kept either way.
    pub fn finish_submission<T>(&mut self, outcome: &CoreResult<T>) {
        self.phase = match outcome {
            Ok(_) => SubmissionPhase::Succeeded,
            Err(e) => SubmissionPhase::Failed(e.to_string()),
        };
    }

    fn ensure_editable(&self) -> CoreResult<()> {
        match self.phase {
            SubmissionPhase::Editing | SubmissionPhase::Failed(_) => Ok(()),
            SubmissionPhase::Submitting | SubmissionPhase::Succeeded => {
                Err(CoreError::invalid("feedback can no longer be edited"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::questions::CANDIDATE_QUESTIONS as CANDIDATE;

    fn candidate_wizard() -> FeedbackWizard {
        FeedbackWizard::new(QuestionSet::for_role(Role::Candidate))
    }

    fn first_choice(wizard: &FeedbackWizard) -> (&'static str, &'static str) {
        let q = wizard.current_question().unwrap();
        (q.id, q.answer_choices[0])
    }

    #[test]
    fn welcome_always_proceeds() {
        let mut wizard = candidate_wizard();
        assert_eq!(wizard.current_step(), Step::Welcome);
        assert!(wizard.can_proceed());
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), Step::Question(0));
    }

    #[test]
    fn question_step_is_gated_on_its_answer() {
        let mut wizard = candidate_wizard();
        wizard.next();
        assert!(!wizard.can_proceed());
        assert!(!wizard.next());
        assert_eq!(wizard.state().current_step_index, 2);

        let (id, answer) = first_choice(&wizard);
        wizard.select_answer(id, answer).unwrap();
        assert!(wizard.can_proceed());
        assert_eq!(wizard.state().current_step_index, 2, "selecting does not advance");
    }

    #[test]
    fn answering_another_question_does_not_unlock_this_one() {
        let mut wizard = candidate_wizard();
        wizard.next();
        wizard
            .select_answer("overall", "Average: okay but could be better.")
            .unwrap();
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn reselecting_overwrites() {
        let mut wizard = candidate_wizard();
        let q = &CANDIDATE[0];
        wizard.select_answer(q.id, q.answer_choices[0]).unwrap();
        wizard.select_answer(q.id, q.answer_choices[2]).unwrap();
        assert_eq!(wizard.state().selected_answers.len(), 1);
        assert_eq!(wizard.state().selected_answers[q.id], q.answer_choices[2]);
    }

    #[test]
    fn unknown_questions_and_answers_are_rejected() {
        let mut wizard = candidate_wizard();
        assert!(matches!(
            wizard.select_answer("nope", "x"),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            wizard.select_answer("clarity", "made up"),
            Err(CoreError::InvalidInput(_))
        ));
    }

    fn walk_to_rating(wizard: &mut FeedbackWizard) {
        wizard.next();
        while let Some(q) = wizard.current_question() {
            wizard.select_answer(q.id, q.answer_choices[1]).unwrap();
            assert!(wizard.next());
        }
        assert_eq!(wizard.current_step(), Step::Rating);
    }

    #[test]
    fn rating_step_needs_a_rating_between_one_and_five() {
        let mut wizard = candidate_wizard();
        walk_to_rating(&mut wizard);
        assert!(!wizard.can_proceed());

        assert!(matches!(wizard.set_rating(0), Err(CoreError::InvalidInput(_))));
        assert!(matches!(wizard.set_rating(6), Err(CoreError::InvalidInput(_))));
        assert!(!wizard.can_proceed());

        for rating in 1..=5 {
            wizard.set_rating(rating).unwrap();
            assert!(wizard.can_proceed());
        }
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), Step::Notes);
        assert!(wizard.is_final_step());
        assert!(wizard.can_proceed());
        assert!(!wizard.next(), "next is a no-op on the last step");
    }

    #[test]
    fn previous_is_always_allowed_but_stops_at_welcome() {
        let mut wizard = candidate_wizard();
        assert!(!wizard.previous());
        wizard.next();
        assert!(!wizard.can_proceed());
        assert!(wizard.previous());
        assert_eq!(wizard.current_step(), Step::Welcome);
    }

    #[test]
    fn progress_is_step_over_total() {
        let mut wizard = candidate_wizard();
        assert_eq!(wizard.total_steps(), 15);
        wizard.next();
        wizard.state.current_step_index = 3;
        let expected = 3.0 / 15.0 * 100.0;
        assert!((wizard.progress_percent() - expected).abs() < f64::EPSILON);

        // 3 of 12 is a quarter of the way through.
        let nine_questions: &'static [QuestionDefinition] = &CANDIDATE[..9];
        let mut short = FeedbackWizard::new(QuestionSet::Candidate(nine_questions));
        assert_eq!(short.total_steps(), 12);
        short.state.current_step_index = 3;
        assert_eq!(short.progress_percent(), 25.0);
    }

    #[test]
    fn step_titles() {
        let mut wizard = candidate_wizard();
        assert_eq!(wizard.step_title(), "Welcome");
        wizard.next();
        assert_eq!(wizard.step_title(), "Question 1 of 12");
        walk_to_rating(&mut wizard);
        assert_eq!(wizard.step_title(), "Overall Rating");
    }

    #[test]
    fn unanswered_questions_are_marked() {
        let mut wizard = FeedbackWizard::new(QuestionSet::for_role(Role::Interviewer));
        wizard
            .select_answer("tech-1", "Basic technical skills that need improvement.")
            .unwrap();
        let answers = wizard.answered_questions();
        assert_eq!(answers.len(), 14);
        assert_eq!(answers[2].answer, "Basic technical skills that need improvement.");
        assert_eq!(answers[0].answer, UNANSWERED);
    }

    fn walk_to_notes(wizard: &mut FeedbackWizard) {
        walk_to_rating(wizard);
        wizard.set_rating(4).unwrap();
        assert!(wizard.next());
        assert!(wizard.is_final_step());
    }

    #[test]
    fn submission_requires_the_last_step() {
        let mut wizard = candidate_wizard();
        assert!(matches!(
            wizard.begin_submission(),
            Err(CoreError::InvalidInput(_))
        ));
        assert_eq!(wizard.phase(), &SubmissionPhase::Editing);

        walk_to_rating(&mut wizard);
        assert!(wizard.begin_submission().is_err(), "rating step is not the last");

        wizard.set_rating(3).unwrap();
        wizard.next();
        wizard.previous();
        wizard.previous();
        assert!(wizard.begin_submission().is_err(), "stepped back to a question");
        assert_eq!(wizard.phase(), &SubmissionPhase::Editing);

        wizard.next();
        wizard.next();
        wizard.begin_submission().unwrap();
        assert_eq!(wizard.phase(), &SubmissionPhase::Submitting);
    }

    #[test]
    fn submission_requires_a_rating() {
        let mut wizard = candidate_wizard();
        walk_to_rating(&mut wizard);
        // Only reachable by bypassing the rating gate.
        wizard.state.current_step_index += 1;
        assert!(wizard.is_final_step());
        assert!(matches!(
            wizard.begin_submission(),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn only_one_submission_at_a_time() {
        let mut wizard = candidate_wizard();
        walk_to_notes(&mut wizard);
        wizard.begin_submission().unwrap();
        assert_eq!(wizard.begin_submission(), Err(CoreError::SubmissionInProgress));
        assert!(wizard.set_notes("late edit").is_err());

        let failed: CoreResult<()> = Err(CoreError::NetworkUnreachable("timeout".into()));
        wizard.finish_submission(&failed);
        assert!(matches!(wizard.phase(), SubmissionPhase::Failed(_)));
        wizard.set_notes("retry with notes").unwrap();
        wizard.begin_submission().unwrap();
        wizard.finish_submission(&Ok(()));
        assert_eq!(wizard.phase(), &SubmissionPhase::Succeeded);
        assert!(wizard.begin_submission().is_err());
    }
}
