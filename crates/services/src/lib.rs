#![forbid(unsafe_code)]

pub mod analytics;
pub mod error;
pub mod sampler;
pub mod sessions;

pub use exam_core::Clock;

pub use analytics::{AnalyticsSink, NoopAnalytics, TestKind};
pub use error::SessionError;
pub use sampler::{sample, sample_with};

pub use sessions::{
    CountdownTicker, MockTestSession, QuestionReview, ResultViewService, SessionState,
    TestProgress, TestReview, TestSessionService, TickOutcome, format_clock,
};
