//! Backend gateway trait

use async_trait::async_trait;

use crate::{CompletionCatalog, QueryRequest, QueryResult, Result};

/// The asynchronous execution backend consumed by the session controller.
///
/// Every call settles exactly once, either with a payload or an error. The
/// gateway makes no ordering promise between overlapping calls: a call issued
/// first may settle after one issued later.
///
/// There is deliberately no cancel entry point. Callers that need to abandon a
/// request must discard its outcome when it settles; the work itself keeps
/// running on the server until it completes.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Execute the request and return its rows
    async fn execute(&self, request: &QueryRequest) -> Result<QueryResult>;

    /// Fetch the tables, columns and keywords of `database` on `connection_id`
    async fn fetch_completion_catalog(
        &self,
        connection_id: &str,
        database: &str,
    ) -> Result<CompletionCatalog>;

    /// List the user databases visible on `connection_id`
    async fn list_databases(&self, connection_id: &str) -> Result<Vec<String>> {
        Err(crate::QueryBenchError::Other(format!(
            "listing databases is not supported for connection '{}'",
            connection_id
        )))
    }
}
