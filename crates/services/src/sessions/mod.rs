mod progress;
mod state;
mod ticker;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::{TestProgress, attempted_percent};
pub use state::{MockTestSession, SessionState};
pub use ticker::CountdownTicker;
pub use view::{QuestionReview, ResultViewService, TestReview, format_clock};
pub use workflow::{TestSessionService, TickOutcome};
