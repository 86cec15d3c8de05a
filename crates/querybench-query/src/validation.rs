//! Submission validation performed by the caller before `submit`

use querybench_core::QueryRequest;

use crate::error::{SubmissionError, SubmissionResult};

/// Check the editor inputs and build the request to submit.
///
/// The controller itself accepts any request; this is the check the UI runs
/// before handing one over.
pub fn validate_submission(
    connection_id: Option<&str>,
    database: Option<&str>,
    sql: &str,
) -> SubmissionResult<QueryRequest> {
    let connection_id = connection_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(SubmissionError::MissingConnection)?;
    let database = database
        .filter(|db| !db.trim().is_empty())
        .ok_or(SubmissionError::MissingDatabase)?;
    if sql.trim().is_empty() {
        return Err(SubmissionError::EmptySql);
    }

    Ok(QueryRequest::new(connection_id, sql).with_database(database))
}
