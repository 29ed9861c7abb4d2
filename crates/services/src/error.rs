//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::ReportError;
use storage::repository::{PoolLoadError, StorageError};

/// Errors emitted by the mock-test session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already submitted")]
    AlreadySubmitted,
    #[error("question position {position} is out of range")]
    PositionOutOfRange { position: usize },
    #[error(transparent)]
    Pool(#[from] PoolLoadError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
