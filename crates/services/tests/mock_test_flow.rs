use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use exam_core::model::{
    CHOICE_COUNT, ContentToken, ExamConfig, Question, QuestionId, QuestionPool, SessionId,
    Subject, TestReport, YearFilter,
};
use exam_core::time::{fixed_clock, fixed_now};
use services::{
    AnalyticsSink, Clock, ResultViewService, SessionError, TestKind, TestSessionService,
    TickOutcome,
};
use storage::repository::{
    InMemoryQuestionBank, InMemoryResultStore, PoolLoadError, ResultStore, StorageError,
};

//
// ─── TEST DOUBLES ─────────────────────────────────────────────────────────────
//

/// Store that counts writes on top of the in-memory backend.
#[derive(Clone, Default)]
struct CountingStore {
    inner: InMemoryResultStore,
    puts: Arc<AtomicUsize>,
}

impl CountingStore {
    fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultStore for CountingStore {
    async fn put(&self, report: &TestReport) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(report).await
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<TestReport>, StorageError> {
        self.inner.get(session_id).await
    }
}

/// Store whose writes always fail, as if the backend were offline.
struct FailingStore;

#[async_trait]
impl ResultStore for FailingStore {
    async fn put(&self, _report: &TestReport) -> Result<(), StorageError> {
        Err(StorageError::Connection("store offline".to_string()))
    }

    async fn get(&self, _session_id: &SessionId) -> Result<Option<TestReport>, StorageError> {
        Ok(None)
    }
}

/// Sink that records every event as one line, in arrival order.
#[derive(Clone, Default)]
struct RecordingAnalytics {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingAnalytics {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn log(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn session_started(&self, subject: Subject, kind: TestKind) {
        self.push(format!("session_started {subject} {kind}"));
    }

    fn answer_selected(&self, _question: &Question, _subject: Subject, choice: usize) {
        self.push(format!("answer_selected choice={choice}"));
    }

    fn answer_changed(
        &self,
        _question: &Question,
        _subject: Subject,
        old_choice: usize,
        new_choice: usize,
    ) {
        self.push(format!("answer_changed {old_choice}->{new_choice}"));
    }

    fn question_answered(
        &self,
        _question: &Question,
        _subject: Subject,
        choice: usize,
        _time_spent_seconds: u32,
        is_correct: bool,
    ) {
        self.push(format!("question_answered choice={choice} correct={is_correct}"));
    }

    fn test_completed(
        &self,
        _subject: Subject,
        total_questions: u32,
        correct_count: u32,
        _time_taken_seconds: u32,
        _year: YearFilter,
    ) {
        self.push(format!("test_completed total={total_questions} correct={correct_count}"));
    }
}

//
// ─── FIXTURES ─────────────────────────────────────────────────────────────────
//

fn question(id: &str, years: &[u16]) -> Question {
    Question::new(
        QuestionId::new(id),
        years.iter().copied(),
        vec![ContentToken::classify(format!("prompt {id}"))],
        std::array::from_fn::<_, CHOICE_COUNT, _>(|i| {
            vec![ContentToken::classify(format!("choice {i}"))]
        }),
        0,
        None,
    )
    .unwrap()
}

/// Bank holding `n` physics questions from 2019, all with choice 0 correct.
fn seeded_bank(n: usize) -> InMemoryQuestionBank {
    let questions = (0..n).map(|i| question(&format!("q{i}"), &[2019])).collect();
    let bank = InMemoryQuestionBank::new();
    bank.register(QuestionPool::new(Subject::Phy, questions).unwrap())
        .unwrap();
    bank
}

fn config(duration: u32, count: usize) -> ExamConfig {
    ExamConfig::new(duration, count).unwrap()
}

//
// ─── FLOWS ────────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn full_flow_grades_persists_and_reviews() {
    let bank = seeded_bank(6);
    let store = InMemoryResultStore::new();
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(bank.clone()),
        Arc::new(store.clone()),
    )
    .with_config(config(3600, 4));

    let mut session = service
        .start_session(Subject::Phy, YearFilter::Random, None)
        .await
        .unwrap();
    assert_eq!(session.total_questions(), 4);

    // Two right, one wrong, one skipped.
    service.select_answer(&mut session, 0, 0).unwrap();
    service.select_answer(&mut session, 1, 0).unwrap();
    service.select_answer(&mut session, 2, 3).unwrap();

    let report = service.submit(&mut session).await.unwrap();
    assert!(session.is_done());
    assert_eq!(report.total_questions(), 4);
    assert_eq!(report.attempted_count(), 3);
    assert_eq!(report.correct_count(), 2);
    assert_eq!(report.time_taken_seconds(), 0);
    assert!((report.accuracy() - 2.0 / 3.0).abs() < 1e-9);

    // The stored payload reads back exactly as graded.
    let stored = store.get(session.session_id()).await.unwrap();
    assert_eq!(stored.as_ref(), Some(&report));

    // And the results page can join it back to its questions.
    let views = ResultViewService::new(Arc::new(bank), Arc::new(store));
    let review = views.review(session.session_id()).await.unwrap().unwrap();
    assert_eq!(review.rows().len(), 4);
    assert_eq!(review.attempted_percent(), 75);
}

#[tokio::test]
async fn expiry_submits_once_and_rejects_a_late_manual_submit() {
    let store = CountingStore::default();
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(seeded_bank(4)),
        Arc::new(store.clone()),
    )
    .with_config(config(2, 4));

    let mut session = service
        .start_session(Subject::Phy, YearFilter::Random, None)
        .await
        .unwrap();

    assert_eq!(
        service.tick(&mut session).await.unwrap(),
        TickOutcome::Running {
            remaining_seconds: 1
        }
    );
    let report = match service.tick(&mut session).await.unwrap() {
        TickOutcome::Submitted(report) => report,
        other => panic!("expected auto-submission, got {other:?}"),
    };
    assert_eq!(report.time_taken_seconds(), 2);
    assert!(session.is_done());

    let err = service.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::AlreadySubmitted));
    assert_eq!(store.put_count(), 1);
}

#[tokio::test]
async fn a_manual_submit_halts_later_ticks() {
    let store = CountingStore::default();
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(seeded_bank(4)),
        Arc::new(store.clone()),
    )
    .with_config(config(600, 4));

    let mut session = service
        .start_session(Subject::Phy, YearFilter::Random, None)
        .await
        .unwrap();
    service.submit(&mut session).await.unwrap();

    assert_eq!(service.tick(&mut session).await.unwrap(), TickOutcome::Halted);
    assert_eq!(store.put_count(), 1);
}

#[tokio::test]
async fn unmatched_year_filters_fall_back_to_the_full_pool() {
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(seeded_bank(6)),
        Arc::new(InMemoryResultStore::new()),
    )
    .with_config(config(3600, 4));

    let session = service
        .start_session(Subject::Phy, YearFilter::Year(1999), None)
        .await
        .unwrap();

    // No 1999 questions exist, so the draw comes from the whole pool while the
    // requested filter stays on record.
    assert_eq!(session.total_questions(), 4);
    assert_eq!(session.year_filter(), YearFilter::Year(1999));
}

#[tokio::test]
async fn an_empty_bank_still_runs_a_zero_question_session() {
    let bank = InMemoryQuestionBank::new();
    bank.register(QuestionPool::new(Subject::Chem, Vec::new()).unwrap())
        .unwrap();
    let store = InMemoryResultStore::new();
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(bank),
        Arc::new(store.clone()),
    );

    let mut session = service
        .start_session(Subject::Chem, YearFilter::Random, None)
        .await
        .unwrap();
    assert_eq!(session.total_questions(), 0);

    let report = service.submit(&mut session).await.unwrap();
    assert_eq!(report.total_questions(), 0);
    assert_eq!(report.accuracy(), 0.0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn a_missing_subject_fails_the_start() {
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(seeded_bank(4)),
        Arc::new(InMemoryResultStore::new()),
    );

    let err = service
        .start_session(Subject::Mat, YearFilter::Random, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Pool(PoolLoadError::MissingSubject {
            subject: Subject::Mat
        })
    ));
}

#[tokio::test]
async fn the_start_keeps_a_carried_id_and_stamps_the_injected_clock() {
    let service = TestSessionService::new(
        fixed_clock(),
        Arc::new(seeded_bank(4)),
        Arc::new(InMemoryResultStore::new()),
    );

    let session = service
        .start_session(Subject::Phy, YearFilter::Random, Some(SessionId::new("from-url")))
        .await
        .unwrap();
    assert_eq!(session.session_id().as_str(), "from-url");
    assert_eq!(session.started_at(), fixed_now());
}

//
// ─── ANALYTICS ────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn analytics_hooks_fire_in_portal_order() {
    let analytics = RecordingAnalytics::default();
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(seeded_bank(4)),
        Arc::new(InMemoryResultStore::new()),
    )
    .with_config(config(3600, 2))
    .with_analytics(Arc::new(analytics.clone()));

    let mut session = service
        .start_session(Subject::Phy, YearFilter::Random, None)
        .await
        .unwrap();

    service.select_answer(&mut session, 0, 1).unwrap();
    // Re-picking the same choice is not an event.
    service.select_answer(&mut session, 0, 1).unwrap();
    service.select_answer(&mut session, 0, 3).unwrap();
    service.select_answer(&mut session, 1, 0).unwrap();
    service.submit(&mut session).await.unwrap();

    assert_eq!(
        analytics.log(),
        vec![
            "session_started phy mock-test",
            "answer_selected choice=1",
            "question_answered choice=1 correct=false",
            "answer_changed 1->3",
            "question_answered choice=3 correct=false",
            "answer_selected choice=0",
            "question_answered choice=0 correct=true",
            "test_completed total=2 correct=1",
        ]
    );
}

#[tokio::test]
async fn a_failing_store_never_blocks_submission() {
    let service = TestSessionService::new(
        Clock::default_clock(),
        Arc::new(seeded_bank(4)),
        Arc::new(FailingStore),
    )
    .with_config(config(600, 4));

    let mut session = service
        .start_session(Subject::Phy, YearFilter::Random, None)
        .await
        .unwrap();
    service.select_answer(&mut session, 0, 0).unwrap();

    // Persistence is best-effort: the candidate still gets their grade.
    let report = service.submit(&mut session).await.unwrap();
    assert!(session.is_done());
    assert_eq!(report.correct_count(), 1);
}
