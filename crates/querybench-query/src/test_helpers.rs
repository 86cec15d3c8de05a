//! Test scaffolding for the query crate
//!
//! [`ScriptedGateway`] never answers on its own: every `execute` call is
//! handed to the test as a [`PendingCall`], and the test decides when and how
//! it settles. This makes out-of-order settlement deterministic.
//!
//! ```ignore
//! let (gateway, mut calls) = ScriptedGateway::new();
//! let controller = Arc::new(QuerySessionController::new(gateway));
//! let submitted = controller.submit(request("SELECT 1"));
//! calls.next().await.succeed(rows(1));
//! assert_eq!(submitted.settled().await, Some(Settlement::Committed));
//! ```

use async_trait::async_trait;
use querybench_core::{
    BackendGateway, CompletionCatalog, QueryBenchError, QueryRequest, QueryResult, Result,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// A backend call waiting for the test to settle it
pub struct PendingCall {
    pub request: QueryRequest,
    responder: oneshot::Sender<Result<QueryResult>>,
}

impl PendingCall {
    pub fn succeed(self, result: QueryResult) {
        let _ = self.responder.send(Ok(result));
    }

    pub fn fail(self, message: impl Into<String>) {
        let _ = self.responder.send(Err(QueryBenchError::Query(message.into())));
    }
}

/// Calls issued against a [`ScriptedGateway`], in issue order
pub struct CallQueue {
    rx: mpsc::UnboundedReceiver<PendingCall>,
}

impl CallQueue {
    pub async fn next(&mut self) -> PendingCall {
        self.rx.recv().await.expect("gateway dropped")
    }
}

pub struct ScriptedGateway {
    tx: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedGateway {
    pub fn new() -> (Arc<Self>, CallQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), CallQueue { rx })
    }
}

#[async_trait]
impl BackendGateway for ScriptedGateway {
    async fn execute(&self, request: &QueryRequest) -> Result<QueryResult> {
        let (responder, response) = oneshot::channel();
        self.tx
            .send(PendingCall {
                request: request.clone(),
                responder,
            })
            .map_err(|_| QueryBenchError::Other("call queue closed".into()))?;

        response
            .await
            .map_err(|_| QueryBenchError::Other("call dropped without settling".into()))?
    }

    async fn fetch_completion_catalog(
        &self,
        _connection_id: &str,
        _database: &str,
    ) -> Result<CompletionCatalog> {
        Ok(CompletionCatalog::default())
    }
}

/// A request against the `local` connection and `shop` database
pub fn request(sql: &str) -> QueryRequest {
    QueryRequest::new("local", sql).with_database("shop")
}

/// A single-column result with `count` rows
pub fn rows(count: usize) -> QueryResult {
    QueryResult {
        columns: vec!["n".to_string()],
        rows: (0..count).map(|i| vec![serde_json::json!(i)]).collect(),
        total_rows: count,
        execution_time_ms: 1,
    }
}
