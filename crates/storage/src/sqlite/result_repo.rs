use chrono::Utc;
use exam_core::model::{SessionId, TestReport};
use sqlx::Row;

use super::SqliteResultStore;
use crate::repository::{ResultStore, StorageError, TestReportRecord};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl ResultStore for SqliteResultStore {
    async fn put(&self, report: &TestReport) -> Result<(), StorageError> {
        let record = TestReportRecord::from_report(report);
        let payload = serde_json::to_string(&record).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO test_reports (session_id, subject, payload, created_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(session_id) DO UPDATE SET
                    subject = excluded.subject,
                    payload = excluded.payload,
                    created_at = excluded.created_at
            ",
        )
        .bind(report.session_id().as_str())
        .bind(report.subject().code())
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<TestReport>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT payload FROM test_reports WHERE session_id = ?1
            ",
        )
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row.try_get("payload").map_err(ser)?;
        let record: TestReportRecord = serde_json::from_str(&payload).map_err(ser)?;
        record.into_report().map(Some).map_err(ser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{AnswerSheet, QuestionId, QuestionStatus, Subject};

    fn report(session_id: &str, time_taken_seconds: u32) -> TestReport {
        let mut answers = AnswerSheet::new();
        answers.select(0, 1);
        answers.select(2, 0);
        TestReport::from_parts(
            SessionId::new(session_id),
            Subject::Chem,
            3,
            2,
            1,
            time_taken_seconds,
            vec![
                QuestionStatus::Correct,
                QuestionStatus::Skipped,
                QuestionStatus::Wrong,
            ],
            vec![
                QuestionId::new("q0"),
                QuestionId::new("q1"),
                QuestionId::new("q2"),
            ],
            answers,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn round_trips_a_report() {
        let store = SqliteResultStore::in_memory().await.unwrap();
        let r = report("sess-1", 420);

        store.put(&r).await.unwrap();
        let fetched = store.get(&SessionId::new("sess-1")).await.unwrap();
        assert_eq!(fetched, Some(r));
    }

    #[tokio::test]
    async fn absent_session_is_none() {
        let store = SqliteResultStore::in_memory().await.unwrap();
        assert_eq!(store.get(&SessionId::new("nobody")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn second_put_replaces_the_payload() {
        let store = SqliteResultStore::in_memory().await.unwrap();
        store.put(&report("sess-1", 100)).await.unwrap();
        store.put(&report("sess-1", 900)).await.unwrap();

        let fetched = store
            .get(&SessionId::new("sess-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.time_taken_seconds(), 900);
    }

    #[tokio::test]
    async fn sessions_do_not_bleed_into_each_other() {
        let store = SqliteResultStore::in_memory().await.unwrap();
        store.put(&report("sess-a", 10)).await.unwrap();
        store.put(&report("sess-b", 20)).await.unwrap();

        let a = store.get(&SessionId::new("sess-a")).await.unwrap().unwrap();
        let b = store.get(&SessionId::new("sess-b")).await.unwrap().unwrap();
        assert_eq!(a.time_taken_seconds(), 10);
        assert_eq!(b.time_taken_seconds(), 20);
    }
}
