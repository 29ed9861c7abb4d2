mod answers;
mod config;
mod content;
mod ids;
mod pool;
mod question;
mod report;
mod subject;

pub use answers::AnswerSheet;
pub use config::{
    ConfigError, DEFAULT_QUESTION_COUNT, DEFAULT_TEST_DURATION_SECONDS, ExamConfig,
};
pub use content::ContentToken;
pub use ids::{QuestionId, SessionId};
pub use pool::{PoolError, QuestionPool};
pub use question::{CHOICE_COUNT, Question, QuestionError};
pub use report::{QuestionStatus, ReportError, TestReport};
pub use subject::{Subject, SubjectParseError, YearFilter};
