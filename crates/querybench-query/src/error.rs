//! Submission errors

use thiserror::Error;

pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Input problems detected before a query is handed to the controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Please select a connection")]
    MissingConnection,

    #[error("Please select a database")]
    MissingDatabase,

    #[error("Please enter a SQL query")]
    EmptySql,
}
