use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::content::ContentToken;
use crate::model::ids::QuestionId;

/// Number of answer choices on every question.
pub const CHOICE_COUNT: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when constructing a question from raw data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("expected {expected} choices, got {got}", expected = CHOICE_COUNT)]
    ChoiceCount { got: usize },

    #[error("correct choice index {index} is out of range")]
    CorrectChoiceOutOfRange { index: usize },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Always four choices, exactly one correct. The correct choice is stored as a
/// 0-based index into `choices`. `years` records the exam years the question
/// appeared in; a question bred for mock tests only may carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    years: BTreeSet<u16>,
    prompt: Vec<ContentToken>,
    choices: [Vec<ContentToken>; CHOICE_COUNT],
    correct: usize,
    explanation: Option<Vec<ContentToken>>,
}

impl Question {
    /// Validates and builds a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id or prompt is empty, or when
    /// `correct` does not index one of the four choices. Empty choice bodies
    /// are allowed; some scanned papers leave a choice as a bare image that
    /// was dropped during digitisation.
    pub fn new(
        id: QuestionId,
        years: impl IntoIterator<Item = u16>,
        prompt: Vec<ContentToken>,
        choices: [Vec<ContentToken>; CHOICE_COUNT],
        correct: usize,
        explanation: Option<Vec<ContentToken>>,
    ) -> Result<Self, QuestionError> {
        if id.as_str().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if correct >= CHOICE_COUNT {
            return Err(QuestionError::CorrectChoiceOutOfRange { index: correct });
        }

        Ok(Self {
            id,
            years: years.into_iter().collect(),
            prompt,
            choices,
            correct,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &[ContentToken] {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[Vec<ContentToken>; CHOICE_COUNT] {
        &self.choices
    }

    /// 0-based index of the correct choice.
    #[must_use]
    pub fn correct_choice(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&[ContentToken]> {
        self.explanation.as_deref()
    }

    /// Exam years this question appeared in, ascending.
    #[must_use]
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.years.iter().copied()
    }

    #[must_use]
    pub fn has_year(&self, year: u16) -> bool {
        self.years.contains(&year)
    }

    /// Whether `choice` picks the correct answer.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
