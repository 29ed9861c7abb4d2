use async_trait::async_trait;
use exam_core::model::{Question, QuestionPool, Subject};
use std::path::{Path, PathBuf};

use crate::repository::{PoolLoadError, QuestionBank, QuestionRecord};

/// Name of the per-subject id index file.
const INDEX_FILE: &str = "_all.json";

//
// ─── JSON DIRECTORY BANK ──────────────────────────────────────────────────────
//

/// Question bank backed by a directory of JSON files.
///
/// Layout: `<root>/<subject>/_all.json` holds the ordered list of question
/// ids, and each id has its own `<root>/<subject>/<id>.json` file. The index
/// is authoritative: files not listed there are invisible, and a listed id
/// whose file is missing or malformed fails the whole load.
#[derive(Debug, Clone)]
pub struct JsonDirQuestionBank {
    root: PathBuf,
}

impl JsonDirQuestionBank {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn subject_dir(&self, subject: Subject) -> PathBuf {
        self.root.join(subject.code())
    }

    async fn read_index(&self, subject: Subject) -> Result<Vec<String>, PoolLoadError> {
        let path = self.subject_dir(subject).join(INDEX_FILE);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PoolLoadError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| PoolLoadError::Parse { path, source })
    }

    async fn read_question(
        &self,
        subject: Subject,
        id: &str,
    ) -> Result<Question, PoolLoadError> {
        let path = self.subject_dir(subject).join(format!("{id}.json"));
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PoolLoadError::Io {
                path: path.clone(),
                source,
            })?;
        let record: QuestionRecord =
            serde_json::from_str(&raw).map_err(|source| PoolLoadError::Parse { path, source })?;
        let id = record.id.clone();
        record
            .into_question()
            .map_err(|source| PoolLoadError::Question { id, source })
    }
}

#[async_trait]
impl QuestionBank for JsonDirQuestionBank {
    async fn load_pool(&self, subject: Subject) -> Result<QuestionPool, PoolLoadError> {
        let ids = self.read_index(subject).await?;
        let mut questions = Vec::with_capacity(ids.len());
        for id in &ids {
            questions.push(self.read_question(subject, id).await?);
        }
        tracing::debug!(subject = %subject, questions = questions.len(), "loaded question pool");
        Ok(QuestionPool::new(subject, questions)?)
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
