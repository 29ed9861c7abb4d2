use std::fmt;

use exam_core::model::{Question, Subject, YearFilter};

//
// ─── TEST KIND ────────────────────────────────────────────────────────────────
//

/// Which flavor of paper the candidate sat down for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    MockTest,
    PreviousYear,
}

impl TestKind {
    /// Derives the kind from the session's year filter: a concrete year means
    /// the candidate is replaying that paper, anything else is a random mock.
    #[must_use]
    pub fn for_filter(filter: YearFilter) -> Self {
        match filter {
            YearFilter::Random => TestKind::MockTest,
            YearFilter::Year(_) => TestKind::PreviousYear,
        }
    }

    /// Identifier used in the event stream.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            TestKind::MockTest => "mock-test",
            TestKind::PreviousYear => "previous-year",
        }
    }

    /// Heading shown on the results page.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TestKind::MockTest => "Mock Test",
            TestKind::PreviousYear => "Previous Year Paper",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

//
// ─── ANALYTICS SINK ───────────────────────────────────────────────────────────
//

/// Fire-and-forget observer of session events.
///
/// Event transport lives outside the engine: every hook returns nothing,
/// defaults to a no-op, and must never block or fail the session flow. An
/// implementation whose delivery can stall should hand events to a channel or
/// background task instead of doing IO inline.
pub trait AnalyticsSink: Send + Sync {
    /// A session was created and its clock started.
    fn session_started(&self, subject: Subject, kind: TestKind) {
        let _ = (subject, kind);
    }

    /// The candidate answered a question that had no recorded choice yet.
    fn answer_selected(&self, question: &Question, subject: Subject, choice: usize) {
        let _ = (question, subject, choice);
    }

    /// The candidate replaced an earlier choice with a different one.
    fn answer_changed(
        &self,
        question: &Question,
        subject: Subject,
        old_choice: usize,
        new_choice: usize,
    ) {
        let _ = (question, subject, old_choice, new_choice);
    }

    /// A choice was recorded, first pick and revision alike.
    fn question_answered(
        &self,
        question: &Question,
        subject: Subject,
        choice: usize,
        time_spent_seconds: u32,
        is_correct: bool,
    ) {
        let _ = (question, subject, choice, time_spent_seconds, is_correct);
    }

    /// The session was graded and its report produced.
    fn test_completed(
        &self,
        subject: Subject,
        total_questions: u32,
        correct_count: u32,
        time_taken_seconds: u32,
        year: YearFilter,
    ) {
        let _ = (subject, total_questions, correct_count, time_taken_seconds, year);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_year_filter() {
        assert_eq!(TestKind::for_filter(YearFilter::Random), TestKind::MockTest);
        assert_eq!(
            TestKind::for_filter(YearFilter::Year(2021)),
            TestKind::PreviousYear
        );
    }

    #[test]
    fn slugs_and_labels_match_the_portal_wording() {
        assert_eq!(TestKind::MockTest.slug(), "mock-test");
        assert_eq!(TestKind::MockTest.label(), "Mock Test");
        assert_eq!(TestKind::PreviousYear.slug(), "previous-year");
        assert_eq!(TestKind::PreviousYear.label(), "Previous Year Paper");
        assert_eq!(TestKind::PreviousYear.to_string(), "previous-year");
    }
}
