use std::collections::HashMap;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::subject::Subject;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("duplicate question id in pool: {id}")]
    DuplicateQuestion { id: QuestionId },
}

//
// ─── QUESTION POOL ────────────────────────────────────────────────────────────
//

/// All questions loaded for one subject.
///
/// Owns the questions and an id index so per-id lookups during review stay
/// O(1). Pools are immutable once built; a session samples from one and holds
/// it for its whole lifetime.
#[derive(Debug, Clone)]
pub struct QuestionPool {
    subject: Subject,
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionPool {
    /// Builds a pool, rejecting duplicate question ids.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::DuplicateQuestion` naming the first repeated id.
    pub fn new(subject: Subject, questions: Vec<Question>) -> Result<Self, PoolError> {
        let mut index = HashMap::with_capacity(questions.len());
        for (i, question) in questions.iter().enumerate() {
            if index.insert(question.id().clone(), i).is_some() {
                return Err(PoolError::DuplicateQuestion {
                    id: question.id().clone(),
                });
            }
        }
        Ok(Self {
            subject,
            questions,
            index,
        })
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|&i| &self.questions[i])
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Ids of every question in the pool, in load order.
    #[must_use]
    pub fn all_ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id().clone()).collect()
    }

    /// Ids of questions that appeared in `year`. May be empty.
    #[must_use]
    pub fn ids_for_year(&self, year: u16) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|q| q.has_year(year))
            .map(|q| q.id().clone())
            .collect()
    }

    /// Resolves ids to questions, silently skipping ids the pool no longer
    /// holds. A stored report can outlive a bank revision.
    #[must_use]
    pub fn questions_for<'a>(
        &'a self,
        ids: impl IntoIterator<Item = &'a QuestionId>,
    ) -> Vec<&'a Question> {
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }

    /// Exam years present anywhere in the pool, newest first.
    #[must_use]
    pub fn available_years(&self) -> Vec<u16> {
        let mut years: Vec<u16> = self
            .questions
            .iter()
            .flat_map(Question::years)
            .collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        years
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
