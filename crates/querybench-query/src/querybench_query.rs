//! QueryBench Query - query sessions, cancellation and history
//!
//! This crate owns the lifecycle of the single in-flight query: submitting it
//! to the backend, cancelling it on the client side, and reconciling late or
//! out-of-order completions against the current state before anything is
//! published or recorded.

mod controller;
mod error;
mod history;
mod registry;
mod session;
mod validation;
mod view_models;

#[cfg(test)]
mod test_helpers;

pub use controller::{
    CANCELLED_MESSAGE, DEFAULT_HISTORY_LIMIT, ExecutionOutcome, QuerySessionController,
    Settlement, SubmittedSession,
};
pub use error::{SubmissionError, SubmissionResult};
pub use history::{QueryHistory, QueryHistoryEntry};
pub use registry::CancellationRegistry;
pub use session::{QuerySession, SessionId};
pub use validation::validate_submission;
pub use view_models::SessionSnapshot;
