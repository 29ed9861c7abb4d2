#![forbid(unsafe_code)]

pub mod json_dir;
pub mod repository;
pub mod sqlite;

pub use json_dir::JsonDirQuestionBank;
pub use repository::{
    InMemoryQuestionBank, InMemoryResultStore, PoolLoadError, QuestionBank, QuestionRecord,
    ResultStore, StorageError, TestReportRecord,
};
pub use sqlite::{SqliteInitError, SqliteResultStore};
