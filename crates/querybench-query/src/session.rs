//! Query sessions

use chrono::{DateTime, Utc};
use querybench_core::QueryRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Opaque identifier of one submitted execution.
///
/// Ids are random v4 UUIDs and are never reused, so a late settlement can
/// never be mistaken for a newer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One submitted SQL execution, immutable once created
#[derive(Debug, Clone)]
pub struct QuerySession {
    pub id: SessionId,
    pub request: QueryRequest,
    /// Wall-clock submission time, recorded in history
    pub started_at: DateTime<Utc>,
    /// Monotonic submission time, used for the history duration
    started: Instant,
}

impl QuerySession {
    pub(crate) fn start(request: QueryRequest) -> Self {
        Self {
            id: SessionId::new(),
            request,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.request.connection_id
    }

    pub fn sql(&self) -> &str {
        &self.request.sql
    }

    pub fn database(&self) -> Option<&str> {
        self.request.database.as_deref()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
