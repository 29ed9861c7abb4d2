use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answers::AnswerSheet;
use crate::model::ids::{QuestionId, SessionId};
use crate::model::subject::Subject;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("too many questions for a single report: {len}")]
    TooManyQuestions { len: usize },

    #[error("{field} count ({stored}) does not match its collection ({derived})")]
    CountMismatch {
        field: &'static str,
        stored: u32,
        derived: u32,
    },

    #[error("status list length ({statuses}) does not match question count ({questions})")]
    LengthMismatch { statuses: usize, questions: usize },

    #[error("attempted count ({attempted}) exceeds total questions ({total})")]
    AttemptedExceedsTotal { attempted: u32, total: u32 },

    #[error("correct count ({correct}) exceeds attempted count ({attempted})")]
    CorrectExceedsAttempted { correct: u32, attempted: u32 },
}

//
// ─── QUESTION STATUS ──────────────────────────────────────────────────────────
//

/// Grading outcome for one question position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    /// Answered with the correct choice.
    Correct,
    /// Answered with any other choice.
    Wrong,
    /// No choice recorded.
    Skipped,
}

//
// ─── TEST REPORT ──────────────────────────────────────────────────────────────
//

/// Graded outcome of one finished test session.
///
/// This is the value handed back on submission and the payload persisted under
/// the session id. Its serialized form uses camelCase keys; `answers` appears
/// as a position-to-choice map and `questionIds` preserves presentation order,
/// which together are enough to rebuild a full per-question review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    session_id: SessionId,
    subject: Subject,
    total_questions: u32,
    attempted_count: u32,
    correct_count: u32,
    time_taken_seconds: u32,
    per_question_status: Vec<QuestionStatus>,
    question_ids: Vec<QuestionId>,
    answers: AnswerSheet,
}

impl TestReport {
    /// Assembles a report, cross-checking every stored count against the
    /// collection it summarises. Used both when grading a live session and
    /// when rehydrating a persisted payload, so a corrupted store entry is
    /// caught here rather than surfacing as nonsense percentages.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` when the counts and collections disagree.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        session_id: SessionId,
        subject: Subject,
        total_questions: u32,
        attempted_count: u32,
        correct_count: u32,
        time_taken_seconds: u32,
        per_question_status: Vec<QuestionStatus>,
        question_ids: Vec<QuestionId>,
        answers: AnswerSheet,
    ) -> Result<Self, ReportError> {
        let derived_total = u32::try_from(question_ids.len()).map_err(|_| {
            ReportError::TooManyQuestions {
                len: question_ids.len(),
            }
        })?;
        if derived_total != total_questions {
            return Err(ReportError::CountMismatch {
                field: "total",
                stored: total_questions,
                derived: derived_total,
            });
        }
        if per_question_status.len() != question_ids.len() {
            return Err(ReportError::LengthMismatch {
                statuses: per_question_status.len(),
                questions: question_ids.len(),
            });
        }

        let derived_attempted = u32::try_from(answers.attempted_count()).map_err(|_| {
            ReportError::TooManyQuestions {
                len: answers.attempted_count(),
            }
        })?;
        if derived_attempted != attempted_count {
            return Err(ReportError::CountMismatch {
                field: "attempted",
                stored: attempted_count,
                derived: derived_attempted,
            });
        }

        let derived_correct = per_question_status
            .iter()
            .filter(|s| **s == QuestionStatus::Correct)
            .count();
        let derived_correct = u32::try_from(derived_correct).map_err(|_| {
            ReportError::TooManyQuestions {
                len: derived_correct,
            }
        })?;
        if derived_correct != correct_count {
            return Err(ReportError::CountMismatch {
                field: "correct",
                stored: correct_count,
                derived: derived_correct,
            });
        }

        if attempted_count > total_questions {
            return Err(ReportError::AttemptedExceedsTotal {
                attempted: attempted_count,
                total: total_questions,
            });
        }
        if correct_count > attempted_count {
            return Err(ReportError::CorrectExceedsAttempted {
                correct: correct_count,
                attempted: attempted_count,
            });
        }

        Ok(Self {
            session_id,
            subject,
            total_questions,
            attempted_count,
            correct_count,
            time_taken_seconds,
            per_question_status,
            question_ids,
            answers,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn attempted_count(&self) -> u32 {
        self.attempted_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn time_taken_seconds(&self) -> u32 {
        self.time_taken_seconds
    }

    #[must_use]
    pub fn per_question_status(&self) -> &[QuestionStatus] {
        &self.per_question_status
    }

    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// Fraction of attempted questions answered correctly.
    ///
    /// Returns 0.0 when nothing was attempted.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.attempted_count == 0 {
            return 0.0;
        }
        f64::from(self.correct_count) / f64::from(self.attempted_count)
    }

    /// Attempt rate relative to the exam's designed pace.
    ///
    /// The designed pace is `total_questions / exam_duration_seconds`; values
    /// above 1.0 mean the candidate moved faster than that. Returns 0.0 when
    /// nothing was attempted, no time elapsed, or the designed pace is
    /// undefined.
    #[must_use]
    pub fn efficiency(&self, exam_duration_seconds: u32) -> f64 {
        if self.attempted_count == 0
            || self.time_taken_seconds == 0
            || self.total_questions == 0
            || exam_duration_seconds == 0
        {
            return 0.0;
        }
        let actual_rate = f64::from(self.attempted_count) / f64::from(self.time_taken_seconds);
        let designed_rate = f64::from(self.total_questions) / f64::from(exam_duration_seconds);
        actual_rate / designed_rate
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
