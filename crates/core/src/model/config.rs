use thiserror::Error;

/// Designed exam length: 60 questions in 60 minutes.
pub const DEFAULT_TEST_DURATION_SECONDS: u32 = 3600;
pub const DEFAULT_QUESTION_COUNT: usize = 60;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("exam duration must be > 0 seconds")]
    InvalidDuration,

    #[error("question count must be > 0")]
    InvalidQuestionCount,
}

//
// ─── EXAM CONFIG ──────────────────────────────────────────────────────────────
//

/// Shape of one mock test: how many questions to draw and how long the clock
/// runs. The defaults mirror the real paper; shorter configs exist mostly for
/// practice drills and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamConfig {
    duration_seconds: u32,
    question_count: usize,
}

impl ExamConfig {
    /// Creates a custom exam shape.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either dimension is zero.
    pub fn new(duration_seconds: u32, question_count: usize) -> Result<Self, ConfigError> {
        if duration_seconds == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        if question_count == 0 {
            return Err(ConfigError::InvalidQuestionCount);
        }
        Ok(Self {
            duration_seconds,
            question_count,
        })
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_TEST_DURATION_SECONDS,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
