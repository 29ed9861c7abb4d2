use chrono::{DateTime, Utc};
use std::fmt;

use exam_core::clock::{SessionClock, Tick};
use exam_core::grader;
use exam_core::model::{
    AnswerSheet, ExamConfig, Question, QuestionId, QuestionPool, ReportError, SessionId,
    Subject, TestReport, YearFilter,
};

use super::progress::{TestProgress, attempted_percent};
use crate::error::SessionError;
use crate::sampler;

//
// ─── CONTROLLER STATE ─────────────────────────────────────────────────────────
//

/// Lifecycle of one mock-test attempt.
///
/// `Submitting` exists so the submit sequence can mark the session claimed
/// before any of its side effects run; whichever trigger loses the race sees
/// it and backs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Submitting,
    Done,
}

//
// ─── MOCK TEST SESSION ────────────────────────────────────────────────────────
//

/// One candidate's attempt at a timed paper.
///
/// Owns the pool for the lifetime of the attempt, the fixed question
/// selection, the answer sheet, and the countdown. Every method here is
/// synchronous; storage and analytics live in the workflow service wrapping
/// this. The selection is drawn once at construction and never re-randomized.
pub struct MockTestSession {
    session_id: SessionId,
    year_filter: YearFilter,
    pool: QuestionPool,
    selected_ids: Vec<QuestionId>,
    answers: AnswerSheet,
    clock: SessionClock,
    started_at: DateTime<Utc>,
    state: SessionState,
}

impl MockTestSession {
    /// Opens a session: applies the year filter (falling back to the whole
    /// pool when the filter matches nothing), samples up to the configured
    /// question count, and starts the clock. An empty pool yields a
    /// zero-question session rather than an error.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        pool: QuestionPool,
        year_filter: YearFilter,
        config: ExamConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        let candidates = match year_filter.year() {
            Some(year) => {
                let filtered = pool.ids_for_year(year);
                if filtered.is_empty() {
                    pool.all_ids()
                } else {
                    filtered
                }
            }
            None => pool.all_ids(),
        };
        let selected_ids = sampler::sample(&candidates, config.question_count());

        let mut clock = SessionClock::new(config.duration_seconds());
        clock.start();

        Self {
            session_id,
            year_filter,
            pool,
            selected_ids,
            answers: AnswerSheet::new(),
            clock,
            started_at,
            state: SessionState::Active,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.pool.subject()
    }

    #[must_use]
    pub fn year_filter(&self) -> YearFilter {
        self.year_filter
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn selected_ids(&self) -> &[QuestionId] {
        &self.selected_ids
    }

    /// Number of questions on this paper.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.selected_ids.len()
    }

    /// The question presented at `position`, if the position is on the paper.
    #[must_use]
    pub fn question_at(&self, position: usize) -> Option<&Question> {
        self.selected_ids
            .get(position)
            .and_then(|id| self.pool.get(id))
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    /// Records `choice` for the question at `position`, returning the choice
    /// it replaced.
    ///
    /// The choice index itself is not range-checked — an out-of-range value
    /// simply grades as wrong — but the position must address a question on
    /// the paper, so the attempted count always means something.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` once submission has started and
    /// `PositionOutOfRange` for positions past the selection.
    pub fn select_answer(
        &mut self,
        position: usize,
        choice: usize,
    ) -> Result<Option<usize>, SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::AlreadySubmitted);
        }
        if position >= self.selected_ids.len() {
            return Err(SessionError::PositionOutOfRange { position });
        }
        Ok(self.answers.select(position, choice))
    }

    /// Freezes the countdown. The driving ticker stops itself on the next
    /// tick once the clock is no longer running.
    pub fn pause(&mut self) {
        if self.state == SessionState::Active {
            self.clock.pause();
        }
    }

    /// Restarts a paused countdown. A fresh ticker must be spawned afterward,
    /// since the previous one exits when it sees a non-running clock.
    pub fn resume(&mut self) {
        if self.state == SessionState::Active {
            self.clock.resume();
        }
    }

    /// Grades the sheet as it stands and assembles the report.
    ///
    /// Pure with respect to the session: submission calls it once at the end,
    /// and a live scoreboard may call it repeatedly without touching the
    /// countdown or the sheet.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Report` if the assembled counts disagree, which
    /// would mean the sheet and the selection fell out of sync.
    pub fn grade_now(&self) -> Result<TestReport, SessionError> {
        let questions = self.pool.questions_for(&self.selected_ids);
        let breakdown = grader::grade(&questions, &self.answers);
        let total = u32::try_from(self.selected_ids.len()).map_err(|_| {
            ReportError::TooManyQuestions {
                len: self.selected_ids.len(),
            }
        })?;

        let report = TestReport::from_parts(
            self.session_id.clone(),
            self.pool.subject(),
            total,
            breakdown.attempted_count,
            breakdown.correct_count,
            self.clock.elapsed_seconds(),
            breakdown.statuses,
            self.selected_ids.clone(),
            self.answers.clone(),
        )?;
        Ok(report)
    }

    /// Snapshot for the in-test sidebar.
    #[must_use]
    pub fn progress(&self) -> TestProgress {
        let total = self.selected_ids.len();
        let attempted = self.answers.attempted_count();
        let answered = (0..total)
            .map(|position| self.answers.selected(position).is_some())
            .collect();

        TestProgress {
            total,
            attempted,
            attempted_percent: attempted_percent(attempted, total),
            answered,
            remaining_seconds: self.clock.remaining_seconds(),
            clock_state: self.clock.state(),
        }
    }

    pub(crate) fn tick_clock(&mut self) -> Tick {
        self.clock.tick()
    }

    /// Claims the one permitted submission. Check and set happen inside this
    /// single synchronous call, with no await point in between, so a user
    /// submit and a clock expiry landing in the same turn cannot both win.
    pub(crate) fn begin_submit(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::AlreadySubmitted);
        }
        self.state = SessionState::Submitting;
        Ok(())
    }

    pub(crate) fn halt_clock(&mut self) {
        self.clock.pause();
    }

    pub(crate) fn finish_submit(&mut self) {
        self.state = SessionState::Done;
    }
}

impl fmt::Debug for MockTestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTestSession")
            .field("session_id", &self.session_id)
            .field("subject", &self.pool.subject())
            .field("year_filter", &self.year_filter)
            .field("selected", &self.selected_ids.len())
            .field("attempted", &self.answers.attempted_count())
            .field("remaining_seconds", &self.clock.remaining_seconds())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
