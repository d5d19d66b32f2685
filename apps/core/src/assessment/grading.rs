//! Grading — pluggable, trait-based scorer for submitted assessments.
//!
//! Default: `AnswerKeyGrader` (pure-Rust, deterministic, fully testable).
//! The engine holds an `Arc<dyn Grader>`, swapped at construction, so a
//! remote grading service can replace it without touching callers.

use std::collections::HashMap;

use super::catalog::{Assessment, QuestionKind};
use super::Answer;

/// Scoring backend. Returns a 0-100 score for a set of answers.
pub trait Grader: Send + Sync {
    fn grade(&self, assessment: &Assessment, answers: &HashMap<usize, Answer>) -> u32;
}

/// Default grader: percentage of questions answered correctly.
///
/// Multiple-choice answers are checked against the answer key. Code
/// answers earn credit when a non-empty submission differs from the
/// starter code (no sandboxed execution in this mock domain). Unanswered
/// or mistyped answers score zero for that question.
pub struct AnswerKeyGrader;

impl Grader for AnswerKeyGrader {
    fn grade(&self, assessment: &Assessment, answers: &HashMap<usize, Answer>) -> u32 {
        let total = assessment.questions.len();
        if total == 0 {
            return 0;
        }

        let correct = assessment
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                matches!(
                    (&question.kind, answers.get(index)),
                    (QuestionKind::MultipleChoice { correct, .. }, Some(Answer::Choice(chosen)))
                        if chosen == correct
                ) || matches!(
                    (&question.kind, answers.get(index)),
                    (QuestionKind::Code { starter_code, .. }, Some(Answer::Code(text)))
                        if !text.trim().is_empty() && text != starter_code
                )
            })
            .count();

        ((correct * 100) / total) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::find_assessment;

    #[test]
    fn test_all_correct_scores_100() {
        let assessment = find_assessment("python-basic").unwrap();
        let mut answers = HashMap::new();
        answers.insert(0, Answer::Choice(1));
        answers.insert(1, Answer::Code("def sum_list(numbers):\n    return sum(numbers)".into()));
        answers.insert(2, Answer::Choice(3));

        assert_eq!(AnswerKeyGrader.grade(&assessment, &answers), 100);
    }

    #[test]
    fn test_unanswered_questions_score_zero() {
        let assessment = find_assessment("python-basic").unwrap();
        let mut answers = HashMap::new();
        answers.insert(0, Answer::Choice(1));

        assert_eq!(AnswerKeyGrader.grade(&assessment, &answers), 33);
    }

    #[test]
    fn test_empty_submission_scores_zero() {
        let assessment = find_assessment("python-basic").unwrap();
        assert_eq!(AnswerKeyGrader.grade(&assessment, &HashMap::new()), 0);
    }

    #[test]
    fn test_unedited_starter_code_earns_no_credit() {
        let assessment = find_assessment("python-basic").unwrap();
        let starter = "def sum_list(numbers):\n    # Write your code here\n    pass";
        let mut answers = HashMap::new();
        answers.insert(1, Answer::Code(starter.into()));

        assert_eq!(AnswerKeyGrader.grade(&assessment, &answers), 0);
    }

    #[test]
    fn test_mistyped_answer_earns_no_credit() {
        let assessment = find_assessment("python-basic").unwrap();
        let mut answers = HashMap::new();
        // Free text supplied for a multiple-choice question.
        answers.insert(0, Answer::Code("the .py one".into()));

        assert_eq!(AnswerKeyGrader.grade(&assessment, &answers), 0);
    }
}
