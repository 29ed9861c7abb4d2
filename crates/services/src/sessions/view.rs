use std::sync::Arc;

use exam_core::model::{Question, QuestionPool, QuestionStatus, SessionId, TestReport};
use storage::repository::{QuestionBank, ResultStore};

use super::progress::attempted_percent;
use crate::error::SessionError;

//
// ─── CLOCK FORMATTING ─────────────────────────────────────────────────────────
//

/// Formats seconds as `MM:SS`. Minutes run past 59 instead of wrapping, so a
/// full hour reads `60:00`.
#[must_use]
pub fn format_clock(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

//
// ─── REVIEW ROWS ──────────────────────────────────────────────────────────────
//

/// One row of the results page: a presented question joined back to how it
/// was graded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub position: usize,
    pub question: Question,
    pub status: QuestionStatus,
    pub selected_choice: Option<usize>,
}

/// A stored report resolved against the question bank for read-only display.
///
/// This is intentionally not a UI view-model: no pre-formatted strings beyond
/// what the engine owns, no layout assumptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReview {
    report: TestReport,
    rows: Vec<QuestionReview>,
}

impl TestReview {
    /// Joins report positions back to pool questions. Rows whose question has
    /// left the bank since the attempt are dropped; the report's counts keep
    /// describing the original session.
    #[must_use]
    pub fn new(report: TestReport, pool: &QuestionPool) -> Self {
        let rows = report
            .question_ids()
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                let question = pool.get(id)?.clone();
                let status = report.per_question_status().get(position).copied()?;
                Some(QuestionReview {
                    position,
                    question,
                    status,
                    selected_choice: report.answers().selected(position),
                })
            })
            .collect();
        Self { report, rows }
    }

    #[must_use]
    pub fn report(&self) -> &TestReport {
        &self.report
    }

    #[must_use]
    pub fn rows(&self) -> &[QuestionReview] {
        &self.rows
    }

    /// Rounded share of the paper attempted, as the results page shows it.
    #[must_use]
    pub fn attempted_percent(&self) -> u8 {
        attempted_percent(
            self.report.attempted_count() as usize,
            self.report.total_questions() as usize,
        )
    }
}

//
// ─── RESULT VIEW SERVICE ──────────────────────────────────────────────────────
//

/// Read side of the results page: fetches a stored report and resolves it
/// against the question bank.
#[derive(Clone)]
pub struct ResultViewService {
    questions: Arc<dyn QuestionBank>,
    results: Arc<dyn ResultStore>,
}

impl ResultViewService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionBank>, results: Arc<dyn ResultStore>) -> Self {
        Self { questions, results }
    }

    /// Fetch the stored report for a session. `None` means nothing was stored
    /// (or the backend evicted it) and the caller renders its no-result
    /// fallback.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the backend itself fails.
    pub async fn fetch_report(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<TestReport>, SessionError> {
        Ok(self.results.get(session_id).await?)
    }

    /// Fetch a report and join it to its questions for display.
    ///
    /// # Errors
    ///
    /// Returns `Storage` for store failures and `Pool` when the subject's
    /// bank cannot be loaded for the join.
    pub async fn review(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<TestReview>, SessionError> {
        let Some(report) = self.results.get(session_id).await? else {
            return Ok(None);
        };
        let pool = self.questions.load_pool(report.subject()).await?;
        Ok(Some(TestReview::new(report, &pool)))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
