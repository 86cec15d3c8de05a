//! Published session state
//!
//! These are DTOs designed for UI consumption.

use querybench_core::QueryResult;
use std::sync::Arc;

use crate::history::QueryHistoryEntry;
use crate::session::SessionId;

/// Immutable view of the controller state, as observed by the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// True while a session occupies the active slot
    pub is_executing: bool,
    pub active_session: Option<SessionId>,
    pub current_result: Option<Arc<QueryResult>>,
    pub current_error: Option<String>,
    /// Newest first
    pub history: Vec<QueryHistoryEntry>,
}
