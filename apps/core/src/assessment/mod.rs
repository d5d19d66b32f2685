//! Assessment Engine — the timed question-navigation state machine.
//!
//! A session is ephemeral: created when the user opens an assessment,
//! dropped on navigation away (no partial credit), and terminal once
//! completed. The engine drives transitions and, on completion, records
//! the earned certificate through the ledger.

pub mod catalog;
pub mod grading;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::accounts::Account;
use crate::certificates::CertificateLedger;
use crate::errors::PortalError;

pub use catalog::{builtin_assessments, find_assessment, Assessment, Question, QuestionKind};
pub use grading::{AnswerKeyGrader, Grader};

/// Default assessment duration: 30 minutes.
pub const DEFAULT_DURATION_SECS: u32 = 1800;

/// A supplied answer. The caller is responsible for matching the answer
/// kind to the question kind; a mismatch is never an error here, it just
/// earns no credit at grading time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(usize),
    Code(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InProgress,
    Submitting,
    Completed,
}

/// Ephemeral state of one in-progress timed test. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSession {
    pub cert_id: String,
    pub current_question: usize,
    pub question_count: usize,
    pub answers: HashMap<usize, Answer>,
    pub remaining_seconds: u32,
    pub phase: Phase,
}

impl AssessmentSession {
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// Drives assessment sessions and records earned certificates.
#[derive(Clone)]
pub struct AssessmentEngine {
    ledger: CertificateLedger,
    grader: Arc<dyn Grader>,
}

impl AssessmentEngine {
    pub fn new(ledger: CertificateLedger, grader: Arc<dyn Grader>) -> Self {
        Self { ledger, grader }
    }

    /// Opens a fresh session on the first question with a full clock.
    pub fn start(&self, assessment: &Assessment) -> AssessmentSession {
        self.start_with_duration(assessment, DEFAULT_DURATION_SECS)
    }

    pub fn start_with_duration(
        &self,
        assessment: &Assessment,
        duration_secs: u32,
    ) -> AssessmentSession {
        debug!(
            "Starting assessment {} ({} questions, {duration_secs}s)",
            assessment.cert_id,
            assessment.question_count()
        );
        AssessmentSession {
            cert_id: assessment.cert_id.clone(),
            current_question: 0,
            question_count: assessment.question_count(),
            answers: HashMap::new(),
            remaining_seconds: duration_secs,
            phase: Phase::InProgress,
        }
    }

    /// Records an answer. Silently ignored unless the session is in
    /// progress; a completed session is immutable.
    pub fn answer(&self, session: &mut AssessmentSession, index: usize, value: Answer) {
        if session.phase != Phase::InProgress {
            return;
        }
        session.answers.insert(index, value);
    }

    /// Moves to another question without touching answers. Rejected with
    /// `IndexOutOfRange` outside the question range.
    pub fn go_to(&self, session: &mut AssessmentSession, index: usize) -> Result<(), PortalError> {
        if session.phase != Phase::InProgress {
            return Ok(());
        }
        if index >= session.question_count {
            return Err(PortalError::IndexOutOfRange {
                index,
                len: session.question_count,
            });
        }
        session.current_question = index;
        Ok(())
    }

    /// One clock step, invoked once per second by the caller's clock
    /// driver. Reaching zero triggers exactly one auto-submit; any later
    /// tick is a no-op. Returns the score when this tick submitted.
    pub fn tick(
        &self,
        session: &mut AssessmentSession,
        assessment: &Assessment,
        user: &Account,
    ) -> Option<u32> {
        if session.phase != Phase::InProgress {
            return None;
        }
        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds == 0 {
            info!("Time expired for {}; auto-submitting", session.cert_id);
            return self.submit(session, assessment, user);
        }
        None
    }

    /// Grades the answers, records the certificate, and completes the
    /// session. Permitted from `InProgress` only; a late call is a no-op
    /// returning `None`. Unanswered questions are allowed.
    pub fn submit(
        &self,
        session: &mut AssessmentSession,
        assessment: &Assessment,
        user: &Account,
    ) -> Option<u32> {
        if session.phase != Phase::InProgress {
            return None;
        }
        session.phase = Phase::Submitting;

        let score = self.grader.grade(assessment, &session.answers);
        self.ledger.earn(user, &session.cert_id, score);

        session.phase = Phase::Completed;
        info!(
            "Assessment {} submitted by {} (score {score})",
            session.cert_id, user.email
        );
        Some(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Role;
    use crate::store::MemoryStore;

    fn user() -> Account {
        Account {
            email: "taker@co.com".into(),
            password: "pw".into(),
            name: "Taker".into(),
            role: Role::Employee,
            company: "Co".into(),
            department: "Engineering".into(),
        }
    }

    fn engine() -> AssessmentEngine {
        let ledger = CertificateLedger::new(Arc::new(MemoryStore::new()));
        AssessmentEngine::new(ledger, Arc::new(AnswerKeyGrader))
    }

    fn engine_with_ledger() -> (AssessmentEngine, CertificateLedger) {
        let ledger = CertificateLedger::new(Arc::new(MemoryStore::new()));
        (
            AssessmentEngine::new(ledger.clone(), Arc::new(AnswerKeyGrader)),
            ledger,
        )
    }

    #[test]
    fn test_start_state() {
        let engine = engine();
        let assessment = find_assessment("python-basic").unwrap();
        let session = engine.start(&assessment);

        assert_eq!(session.current_question, 0);
        assert_eq!(session.remaining_seconds, DEFAULT_DURATION_SECS);
        assert_eq!(session.phase, Phase::InProgress);
        assert!(session.answers.is_empty());
    }

    #[test]
    fn test_go_to_bounds() {
        let engine = engine();
        let assessment = find_assessment("python-basic").unwrap();
        let mut session = engine.start(&assessment);

        engine.go_to(&mut session, 2).unwrap();
        assert_eq!(session.current_question, 2);

        let err = engine.go_to(&mut session, 3).unwrap_err();
        assert!(matches!(err, PortalError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(session.current_question, 2);
    }

    #[test]
    fn test_submit_with_unanswered_questions() {
        let (engine, ledger) = engine_with_ledger();
        let assessment = find_assessment("python-basic").unwrap();
        let mut session = engine.start(&assessment);

        engine.answer(&mut session, 0, Answer::Choice(1));
        let score = engine.submit(&mut session, &assessment, &user()).unwrap();

        assert_eq!(score, 33);
        assert!(session.is_completed());
        assert_eq!(ledger.list_for("taker@co.com").len(), 1);
    }

    #[test]
    fn test_ticks_drive_exactly_one_auto_submit() {
        let (engine, ledger) = engine_with_ledger();
        let assessment = find_assessment("python-basic").unwrap();
        let mut session = engine.start_with_duration(&assessment, 5);
        let taker = user();

        // Interleaved navigation and answers must not disturb the clock.
        engine.answer(&mut session, 0, Answer::Choice(1));
        engine.go_to(&mut session, 1).unwrap();

        let mut submissions = 0;
        for _ in 0..5 {
            if engine.tick(&mut session, &assessment, &taker).is_some() {
                submissions += 1;
            }
        }

        assert_eq!(submissions, 1);
        assert!(session.is_completed());
        assert_eq!(session.remaining_seconds, 0);
        assert_eq!(ledger.list_for("taker@co.com").len(), 1);

        // Late ticks never re-submit.
        assert!(engine.tick(&mut session, &assessment, &taker).is_none());
        assert_eq!(ledger.list_for("taker@co.com").len(), 1);
    }

    #[test]
    fn test_mutation_after_completed_is_noop() {
        let engine = engine();
        let assessment = find_assessment("python-basic").unwrap();
        let mut session = engine.start(&assessment);
        let taker = user();

        engine.answer(&mut session, 0, Answer::Choice(1));
        engine.submit(&mut session, &assessment, &taker);

        let snapshot = session.answers.clone();
        engine.answer(&mut session, 1, Answer::Code("x".into()));
        engine.go_to(&mut session, 2).unwrap();
        engine.tick(&mut session, &assessment, &taker);

        assert_eq!(session.answers, snapshot);
        assert_eq!(session.current_question, 0);
        assert_eq!(session.phase, Phase::Completed);
    }

    #[test]
    fn test_double_submit_records_once() {
        let (engine, ledger) = engine_with_ledger();
        let assessment = find_assessment("react-basic").unwrap();
        let mut session = engine.start(&assessment);
        let taker = user();

        assert!(engine.submit(&mut session, &assessment, &taker).is_some());
        assert!(engine.submit(&mut session, &assessment, &taker).is_none());
        assert_eq!(ledger.list_for("taker@co.com").len(), 1);
    }

    #[test]
    fn test_dropping_session_has_no_side_effects() {
        let (engine, ledger) = engine_with_ledger();
        let assessment = find_assessment("python-basic").unwrap();
        let mut session = engine.start(&assessment);
        engine.answer(&mut session, 0, Answer::Choice(1));
        drop(session);

        assert!(ledger.list_for("taker@co.com").is_empty());
    }
}
