use std::sync::Arc;

use exam_core::Clock;
use exam_core::clock::Tick;
use exam_core::model::{ExamConfig, SessionId, Subject, TestReport, YearFilter};
use storage::repository::{QuestionBank, ResultStore};

use super::state::MockTestSession;
use crate::analytics::{AnalyticsSink, NoopAnalytics, TestKind};
use crate::error::SessionError;

/// What one driven tick did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// One second consumed; keep driving.
    Running { remaining_seconds: u32 },
    /// The clock was not running — paused, or the session is past
    /// submission — so the driver should stop.
    Halted,
    /// The tick spent the final second and auto-submission completed.
    Submitted(TestReport),
}

/// Orchestrates a mock-test attempt around storage and analytics.
#[derive(Clone)]
pub struct TestSessionService {
    clock: Clock,
    questions: Arc<dyn QuestionBank>,
    results: Arc<dyn ResultStore>,
    analytics: Arc<dyn AnalyticsSink>,
    config: ExamConfig,
}

impl TestSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionBank>,
        results: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
            analytics: Arc::new(NoopAnalytics),
            config: ExamConfig::default(),
        }
    }

    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ExamConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the subject's pool and open a session against it.
    ///
    /// The year filter falls back to the whole pool when it matches nothing,
    /// and an empty pool opens a zero-question session; only a failed pool
    /// load refuses the attempt. The countdown starts immediately. A fresh
    /// session id is generated unless the caller carries one (e.g. from a
    /// URL parameter), which is used verbatim.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Pool` when the subject's data cannot be loaded.
    pub async fn start_session(
        &self,
        subject: Subject,
        year_filter: YearFilter,
        session_id: Option<SessionId>,
    ) -> Result<MockTestSession, SessionError> {
        let pool = self.questions.load_pool(subject).await?;
        let session_id = session_id.unwrap_or_else(SessionId::generate);
        let session =
            MockTestSession::new(session_id, pool, year_filter, self.config, self.clock.now());

        tracing::debug!(
            session_id = %session.session_id(),
            subject = %subject,
            selected = session.total_questions(),
            "mock test session started"
        );
        self.analytics
            .session_started(subject, TestKind::for_filter(year_filter));
        Ok(session)
    }

    /// Record a choice and emit the matching analytics events.
    ///
    /// A first pick fires `answer_selected`, replacing a different earlier
    /// pick fires `answer_changed`, and re-picking the same value fires
    /// nothing; every recorded change additionally fires `question_answered`
    /// with the session time spent so far.
    ///
    /// # Errors
    ///
    /// Propagates the session's own gating: `AlreadySubmitted` once
    /// submission has started, `PositionOutOfRange` off the paper.
    pub fn select_answer(
        &self,
        session: &mut MockTestSession,
        position: usize,
        choice: usize,
    ) -> Result<Option<usize>, SessionError> {
        let previous = session.select_answer(position, choice)?;
        let subject = session.subject();
        let Some(question) = session.question_at(position) else {
            return Ok(previous);
        };

        match previous {
            None => self.analytics.answer_selected(question, subject, choice),
            Some(old) if old != choice => {
                self.analytics.answer_changed(question, subject, old, choice);
            }
            Some(_) => return Ok(previous),
        }
        self.analytics.question_answered(
            question,
            subject,
            choice,
            session.clock().elapsed_seconds(),
            question.is_correct(choice),
        );
        Ok(previous)
    }

    /// Submit the session: grade, persist, and close, exactly once.
    ///
    /// The guard is claimed synchronously before anything else happens, so a
    /// user submit racing the clock's expiry can never grade or persist
    /// twice; the losing trigger observes `AlreadySubmitted`. Persistence is
    /// best-effort: a failed put is logged and the report still returned, and
    /// the downstream view falls back to its no-result state.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` when submission already ran, or `Report`
    /// if the graded counts disagree (a bug, not an expected path).
    pub async fn submit(&self, session: &mut MockTestSession) -> Result<TestReport, SessionError> {
        session.begin_submit()?;
        session.halt_clock();

        let report = session.grade_now()?;
        self.analytics.test_completed(
            report.subject(),
            report.total_questions(),
            report.correct_count(),
            report.time_taken_seconds(),
            session.year_filter(),
        );

        if let Err(err) = self.results.put(&report).await {
            tracing::warn!(
                session_id = %report.session_id(),
                error = %err,
                "failed to persist test report; continuing"
            );
        }

        session.finish_submit();
        tracing::debug!(
            session_id = %report.session_id(),
            attempted = report.attempted_count(),
            correct = report.correct_count(),
            "mock test session submitted"
        );
        Ok(report)
    }

    /// Drive the countdown one second.
    ///
    /// On the expiry tick this runs the same guarded submit sequence as
    /// [`TestSessionService::submit`], so timeout and user submission cannot
    /// both fire.
    ///
    /// # Errors
    ///
    /// Propagates submit errors when the expiry tick triggers submission.
    pub async fn tick(&self, session: &mut MockTestSession) -> Result<TickOutcome, SessionError> {
        match session.tick_clock() {
            Tick::Ignored => Ok(TickOutcome::Halted),
            Tick::Running { remaining_seconds } => Ok(TickOutcome::Running { remaining_seconds }),
            Tick::Expired => {
                let report = self.submit(session).await?;
                Ok(TickOutcome::Submitted(report))
            }
        }
    }
}
