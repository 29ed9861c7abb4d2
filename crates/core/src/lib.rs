#![forbid(unsafe_code)]

pub mod clock;
pub mod grader;
pub mod model;
pub mod time;

pub use clock::{ClockState, SessionClock, Tick};
pub use grader::{GradeBreakdown, grade};
pub use time::Clock;

pub use model::{
    AnswerSheet, CHOICE_COUNT, ConfigError, ContentToken, DEFAULT_QUESTION_COUNT,
    DEFAULT_TEST_DURATION_SECONDS, ExamConfig, PoolError, Question, QuestionError, QuestionId,
    QuestionPool, QuestionStatus, ReportError, SessionId, Subject, SubjectParseError, TestReport,
    YearFilter,
};
