use async_trait::async_trait;
use exam_core::model::{
    AnswerSheet, CHOICE_COUNT, ContentToken, PoolError, Question, QuestionError, QuestionId,
    QuestionPool, QuestionStatus, ReportError, SessionId, Subject, TestReport,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors surfaced by result-store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failure to assemble a subject's question pool.
///
/// Always fatal for the session being started: a partially loaded pool would
/// silently shrink the sampling universe, so no variant here is recoverable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid question {id}: {source}")]
    Question {
        id: QuestionId,
        #[source]
        source: QuestionError,
    },

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("no question data for subject {subject}")]
    MissingSubject { subject: Subject },

    #[error("question bank unavailable: {0}")]
    Backend(String),
}

//
// ─── RECORDS ──────────────────────────────────────────────────────────────────
//

/// On-disk shape of one question file.
///
/// Mirrors the domain `Question` so backends can deserialize without leaking
/// storage concerns into the domain layer. Prompt, choices, and explanation
/// are flat string lists; token classification happens during conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question: Vec<String>,
    pub choices: Vec<Vec<String>>,
    pub correct_answer: usize,
    #[serde(default)]
    pub years: Vec<u16>,
    #[serde(default)]
    pub explanation: Vec<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().clone(),
            question: question
                .prompt()
                .iter()
                .map(|t| t.as_raw().to_owned())
                .collect(),
            choices: question
                .choices()
                .iter()
                .map(|c| c.iter().map(|t| t.as_raw().to_owned()).collect())
                .collect(),
            correct_answer: question.correct_choice(),
            years: question.years().collect(),
            explanation: question
                .explanation()
                .map(|e| e.iter().map(|t| t.as_raw().to_owned()).collect())
                .unwrap_or_default(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record does not carry exactly four
    /// choices or fails domain validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let got = self.choices.len();
        let choices: [Vec<String>; CHOICE_COUNT] = self
            .choices
            .try_into()
            .map_err(|_| QuestionError::ChoiceCount { got })?;
        let choices: [Vec<ContentToken>; CHOICE_COUNT] =
            choices.map(|c| c.into_iter().map(ContentToken::from).collect());

        let prompt = self.question.into_iter().map(ContentToken::from).collect();
        let explanation = if self.explanation.is_empty() {
            None
        } else {
            Some(self.explanation.into_iter().map(ContentToken::from).collect())
        };

        Question::new(
            self.id,
            self.years,
            prompt,
            choices,
            self.correct_answer,
            explanation,
        )
    }
}

/// Persisted shape of a graded report, stored as one JSON payload per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReportRecord {
    pub session_id: SessionId,
    pub subject: Subject,
    pub total_questions: u32,
    pub attempted_count: u32,
    pub correct_count: u32,
    pub time_taken_seconds: u32,
    pub per_question_status: Vec<QuestionStatus>,
    pub question_ids: Vec<QuestionId>,
    pub answers: AnswerSheet,
}

impl TestReportRecord {
    #[must_use]
    pub fn from_report(report: &TestReport) -> Self {
        Self {
            session_id: report.session_id().clone(),
            subject: report.subject(),
            total_questions: report.total_questions(),
            attempted_count: report.attempted_count(),
            correct_count: report.correct_count(),
            time_taken_seconds: report.time_taken_seconds(),
            per_question_status: report.per_question_status().to_vec(),
            question_ids: report.question_ids().to_vec(),
            answers: report.answers().clone(),
        }
    }

    /// Convert the record back into a domain `TestReport`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` when the persisted counts no longer match the
    /// persisted collections.
    pub fn into_report(self) -> Result<TestReport, ReportError> {
        TestReport::from_parts(
            self.session_id,
            self.subject,
            self.total_questions,
            self.attempted_count,
            self.correct_count,
            self.time_taken_seconds,
            self.per_question_status,
            self.question_ids,
            self.answers,
        )
    }
}

//
// ─── TRAITS ───────────────────────────────────────────────────────────────────
//

/// Source of question pools, one per subject.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Load the full pool for a subject.
    ///
    /// # Errors
    ///
    /// Returns `PoolLoadError` if any part of the subject's data cannot be
    /// read, parsed, or validated. There is no partial success.
    async fn load_pool(&self, subject: Subject) -> Result<QuestionPool, PoolLoadError>;
}

/// Keyed store for graded reports, written once per session.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist a report under its session id, replacing any earlier payload
    /// stored there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the report cannot be stored.
    async fn put(&self, report: &TestReport) -> Result<(), StorageError>;

    /// Fetch the report for a session, `None` when nothing was stored or the
    /// backend evicted it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure, not on absence.
    async fn get(&self, session_id: &SessionId) -> Result<Option<TestReport>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATIONS ────────────────────────────────────────────────
//

/// In-memory question bank for testing and seeded setups.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    pools: Arc<Mutex<HashMap<Subject, QuestionPool>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a pool, replacing any earlier one for the same subject.
    ///
    /// # Errors
    ///
    /// Returns `PoolLoadError::Backend` if the bank's lock is poisoned.
    pub fn register(&self, pool: QuestionPool) -> Result<(), PoolLoadError> {
        let mut guard = self
            .pools
            .lock()
            .map_err(|e| PoolLoadError::Backend(e.to_string()))?;
        guard.insert(pool.subject(), pool);
        Ok(())
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn load_pool(&self, subject: Subject) -> Result<QuestionPool, PoolLoadError> {
        let guard = self
            .pools
            .lock()
            .map_err(|e| PoolLoadError::Backend(e.to_string()))?;
        guard
            .get(&subject)
            .cloned()
            .ok_or(PoolLoadError::MissingSubject { subject })
    }
}

/// In-memory result store for testing and single-process runs.
#[derive(Clone, Default)]
pub struct InMemoryResultStore {
    reports: Arc<Mutex<HashMap<SessionId, TestReport>>>,
}

impl InMemoryResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored reports. Test helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().map(|g| g.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn put(&self, report: &TestReport) -> Result<(), StorageError> {
        let mut guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(report.session_id().clone(), report.clone());
        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<TestReport>, StorageError> {
        let guard = self
            .reports
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(session_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question(id: &str, correct: usize, years: &[u16]) -> Question {
        Question::new(
            QuestionId::new(id),
            years.iter().copied(),
            vec![ContentToken::classify("Which gas drives photorespiration?")],
            std::array::from_fn::<_, CHOICE_COUNT, _>(|i| {
                vec![ContentToken::classify(format!("option {i}"))]
            }),
            correct,
            None,
        )
        .unwrap()
    }

    fn build_report(session_id: &str) -> TestReport {
        let mut answers = AnswerSheet::new();
        answers.select(0, 2);
        TestReport::from_parts(
            SessionId::new(session_id),
            Subject::Bio,
            2,
            1,
            1,
            300,
            vec![QuestionStatus::Correct, QuestionStatus::Skipped],
            vec![QuestionId::new("q0"), QuestionId::new("q1")],
            answers,
        )
        .unwrap()
    }

    #[test]
    fn question_record_round_trips() {
        let question = build_question("q1", 2, &[2019, 2022]);
        let record = QuestionRecord::from_question(&question);
        assert_eq!(record.correct_answer, 2);
        assert_eq!(record.years, vec![2019, 2022]);

        let back = record.into_question().unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn question_record_rejects_wrong_choice_count() {
        let mut record = QuestionRecord::from_question(&build_question("q1", 0, &[]));
        record.choices.pop();
        let err = record.into_question().unwrap_err();
        assert_eq!(err, QuestionError::ChoiceCount { got: 3 });
    }

    #[test]
    fn question_record_parses_bank_json() {
        let json = r#"{
            "id": "e942324a-649a-4cdc-9ad3-631b6784e641",
            "question": ["Name the figure:", "images/bio/krebs.png"],
            "choices": [["Glycolysis"], ["Krebs cycle"], ["Calvin cycle"], ["Fermentation"]],
            "correctAnswer": 1,
            "years": [2021]
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        let question = record.into_question().unwrap();

        assert!(question.prompt()[1].is_image());
        assert_eq!(question.correct_choice(), 1);
        assert_eq!(question.explanation(), None);
    }

    #[test]
    fn empty_explanation_becomes_none() {
        let json = r#"{
            "id": "q9",
            "question": ["?"],
            "choices": [["a"], ["b"], ["c"], ["d"]],
            "correctAnswer": 0,
            "explanation": []
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert!(record.into_question().unwrap().explanation().is_none());
    }

    #[test]
    fn report_record_round_trips() {
        let report = build_report("sess-1");
        let record = TestReportRecord::from_report(&report);
        let json = serde_json::to_string(&record).unwrap();
        let parsed: TestReportRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.into_report().unwrap(), report);
    }

    #[test]
    fn tampered_report_payload_is_rejected() {
        let mut record = TestReportRecord::from_report(&build_report("sess-1"));
        record.correct_count = 2;
        assert!(record.into_report().is_err());
    }

    #[tokio::test]
    async fn in_memory_bank_serves_registered_pools() {
        let bank = InMemoryQuestionBank::new();
        let pool = QuestionPool::new(Subject::Phy, vec![build_question("q1", 0, &[])]).unwrap();
        bank.register(pool).unwrap();

        let loaded = bank.load_pool(Subject::Phy).await.unwrap();
        assert_eq!(loaded.len(), 1);

        let err = bank.load_pool(Subject::Chem).await.unwrap_err();
        assert!(matches!(
            err,
            PoolLoadError::MissingSubject {
                subject: Subject::Chem
            }
        ));
    }

    #[tokio::test]
    async fn in_memory_store_round_trips_reports() {
        let store = InMemoryResultStore::new();
        let report = build_report("sess-42");

        store.put(&report).await.unwrap();
        let fetched = store.get(&SessionId::new("sess-42")).await.unwrap();
        assert_eq!(fetched, Some(report.clone()));

        assert_eq!(store.get(&SessionId::new("other")).await.unwrap(), None);

        // A second put under the same id replaces, never duplicates.
        store.put(&report).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
