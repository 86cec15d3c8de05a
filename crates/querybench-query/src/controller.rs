//! Query session controller
//!
//! Owns the active slot, the cancellation registry and the history, and
//! reconciles every backend settlement against them before publishing.
//!
//! The backend has no cancel primitive and no ordering guarantee, so a
//! session can only ever be *marked* stale. When its call settles the outcome
//! goes through [`QuerySessionController::settle`]:
//!
//! | check                         | verdict                  | effect                       |
//! |-------------------------------|--------------------------|------------------------------|
//! | id is in the cancel registry  | [`Settlement::Cancelled`]  | registry entry removed only  |
//! | id is not the active session  | [`Settlement::Superseded`] | none                         |
//! | otherwise                     | [`Settlement::Committed`]  | result/error stored, history |
//!
//! All transitions run under one lock, so the controller behaves as a single
//! logical thread even when settlements arrive on different runtime workers.

use parking_lot::Mutex;
use querybench_core::{BackendGateway, QueryRequest, QueryResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::history::{QueryHistory, QueryHistoryEntry};
use crate::registry::CancellationRegistry;
use crate::session::{QuerySession, SessionId};
use crate::view_models::SessionSnapshot;


/// Maximum number of history entries kept by default
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Error message published when the user cancels the active session
pub const CANCELLED_MESSAGE: &str = "Query cancelled by user";

/// Outcome of one backend call: rows, or a human-readable error message
pub type ExecutionOutcome = Result<QueryResult, String>;

/// What the controller did with a settled backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The session was still active; its outcome was published and recorded
    Committed,
    /// The session had been cancelled; the outcome was dropped
    Cancelled,
    /// A newer session was submitted before this one settled; the outcome was dropped
    Superseded,
}

impl Settlement {
    pub fn is_discarded(&self) -> bool {
        !matches!(self, Self::Committed)
    }
}

/// Handle returned by [`QuerySessionController::submit`].
///
/// Dropping it detaches the background call; the controller still reconciles
/// the outcome when it settles.
#[derive(Debug)]
pub struct SubmittedSession {
    id: SessionId,
    task: JoinHandle<Settlement>,
}

impl SubmittedSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Wait for the backend call to settle and return the reconciliation verdict.
    ///
    /// Returns `None` if the background task panicked.
    pub async fn settled(self) -> Option<Settlement> {
        match self.task.await {
            Ok(settlement) => Some(settlement),
            Err(e) => {
                tracing::error!(session_id = %self.id, error = %e, "query task failed");
                None
            }
        }
    }
}

struct ControllerState {
    active: Option<SessionId>,
    in_flight: HashMap<SessionId, QuerySession>,
    cancelled: CancellationRegistry,
    history: QueryHistory,
    current_result: Option<Arc<QueryResult>>,
    current_error: Option<String>,
}

impl ControllerState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            is_executing: self.active.is_some(),
            active_session: self.active,
            current_result: self.current_result.clone(),
            current_error: self.current_error.clone(),
            history: self.history.to_vec(),
        }
    }
}

/// Controller for the single in-flight query of a workbench.
///
/// Cancellation is client-side only: [`Self::cancel`] releases the UI at
/// once, but the backend call keeps running until it settles on its own, at
/// which point its outcome is discarded. Nothing is ever aborted on the server.
///
/// Construct one per workbench and share it behind an `Arc`.
pub struct QuerySessionController {
    gateway: Arc<dyn BackendGateway>,
    state: Mutex<ControllerState>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl QuerySessionController {
    /// Create a controller keeping [`DEFAULT_HISTORY_LIMIT`] history entries
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self::with_history_limit(gateway, DEFAULT_HISTORY_LIMIT)
    }

    /// Create a controller keeping fewer history entries.
    ///
    /// Limits above [`DEFAULT_HISTORY_LIMIT`] are clamped to it.
    pub fn with_history_limit(gateway: Arc<dyn BackendGateway>, history_limit: usize) -> Self {
        if history_limit > DEFAULT_HISTORY_LIMIT {
            tracing::warn!(
                requested = history_limit,
                limit = DEFAULT_HISTORY_LIMIT,
                "history limit clamped"
            );
        }
        let history_limit = history_limit.min(DEFAULT_HISTORY_LIMIT);
        let state = ControllerState {
            active: None,
            in_flight: HashMap::new(),
            cancelled: CancellationRegistry::new(),
            history: QueryHistory::new(history_limit),
            current_result: None,
            current_error: None,
        };
        let (snapshot_tx, _) = watch::channel(state.snapshot());

        Self {
            gateway,
            state: Mutex::new(state),
            snapshot_tx,
        }
    }

    /// Submit a request and return immediately.
    ///
    /// The new session becomes the active one; any session still running is
    /// superseded. Must be called from within a Tokio runtime.
    pub fn submit(self: &Arc<Self>, request: QueryRequest) -> SubmittedSession {
        let session = self.begin(request);
        let id = session.id;
        let span = tracing::info_span!(
            "query_session",
            session_id = %id,
            connection_id = %session.connection_id(),
        );

        let controller = Arc::clone(self);
        let task = tokio::spawn(
            async move {
                let outcome = controller
                    .gateway
                    .execute(&session.request)
                    .await
                    .map_err(|e| e.to_string());
                controller.settle(id, outcome)
            }
            .instrument(span),
        );

        SubmittedSession { id, task }
    }

    /// Register a new session as the active one without issuing the backend call.
    ///
    /// [`Self::submit`] is `begin` followed by the gateway call and [`Self::settle`];
    /// callers driving their own executor can use the two halves directly.
    pub fn begin(&self, request: QueryRequest) -> QuerySession {
        let session = QuerySession::start(request);
        let mut state = self.state.lock();

        if let Some(previous) = state.active {
            tracing::debug!(
                previous_session = %previous,
                session_id = %session.id,
                "superseding active session"
            );
        }

        state.in_flight.insert(session.id, session.clone());
        state.active = Some(session.id);
        state.current_error = None;

        tracing::info!(
            session_id = %session.id,
            connection_id = %session.connection_id(),
            database = ?session.database(),
            sql_preview = %session.request.sql_preview(),
            "query submitted"
        );

        self.publish(&state);
        session
    }

    /// Reconcile the outcome of session `id` against the current state.
    ///
    /// Runs once per settled backend call.
    pub fn settle(&self, id: SessionId, outcome: ExecutionOutcome) -> Settlement {
        let mut state = self.state.lock();
        let session = state.in_flight.remove(&id);

        if state.cancelled.take(id) {
            tracing::debug!(session_id = %id, "discarding outcome of cancelled session");
            return Settlement::Cancelled;
        }

        if state.active != Some(id) {
            tracing::debug!(
                session_id = %id,
                active_session = ?state.active,
                "discarding outcome of superseded session"
            );
            return Settlement::Superseded;
        }

        state.active = None;
        let Some(session) = session else {
            // Unreachable through `begin`, which always records the session.
            tracing::warn!(session_id = %id, "active session missing from in-flight table");
            self.publish(&state);
            return Settlement::Superseded;
        };

        let duration_ms = session.elapsed_ms();
        match outcome {
            Ok(result) => {
                tracing::info!(
                    session_id = %id,
                    rows = result.row_count(),
                    duration_ms,
                    "query completed"
                );
                state
                    .history
                    .add(QueryHistoryEntry::success(&session, duration_ms, result.row_count() as u64));
                state.current_result = Some(Arc::new(result));
                state.current_error = None;
            }
            Err(message) => {
                tracing::warn!(session_id = %id, error = %message, duration_ms, "query failed");
                state
                    .history
                    .add(QueryHistoryEntry::failure(&session, duration_ms, message.clone()));
                state.current_error = Some(message);
            }
        }

        self.publish(&state);
        Settlement::Committed
    }

    /// Cancel the active session, if any, and release the UI immediately.
    ///
    /// The backend call is not interrupted; its outcome is dropped when it
    /// eventually settles. Returns the id of the cancelled session.
    pub fn cancel(&self) -> Option<SessionId> {
        let mut state = self.state.lock();
        let id = state.active.take()?;

        state.cancelled.insert(id);
        state.current_error = Some(CANCELLED_MESSAGE.to_string());
        tracing::info!(session_id = %id, "query cancelled by user");

        self.publish(&state);
        Some(id)
    }

    pub fn clear_error(&self) {
        let mut state = self.state.lock();
        state.current_error = None;
        self.publish(&state);
    }

    pub fn clear_result(&self) {
        let mut state = self.state.lock();
        state.current_result = None;
        self.publish(&state);
    }

    pub fn clear_history(&self) {
        let mut state = self.state.lock();
        state.history.clear();
        self.publish(&state);
    }

    /// Receive every published state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().snapshot()
    }

    pub fn is_executing(&self) -> bool {
        self.state.lock().active.is_some()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.state.lock().active
    }

    /// Number of cancelled sessions whose backend call has not settled yet
    pub fn pending_cancellations(&self) -> usize {
        self.state.lock().cancelled.len()
    }

    /// Number of sessions whose backend call has not settled yet
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    pub fn history(&self) -> Vec<QueryHistoryEntry> {
        self.state.lock().history.to_vec()
    }

    /// History entries whose SQL contains `text`, ignoring case, newest first
    pub fn search_history(&self, text: &str) -> Vec<QueryHistoryEntry> {
        self.state.lock().history.search(text).cloned().collect()
    }

    fn publish(&self, state: &ControllerState) {
        self.snapshot_tx.send_replace(state.snapshot());
    }
}
