//! Query session — the `Idle → Loading → Success | Error` lifecycle.
//!
//! Each [`QuerySession::submit`] supersedes the previous query: its task is
//! aborted and a new generation is started. A task only publishes its outcome
//! while its generation is still current, so a slow superseded query can never
//! overwrite a newer result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chips_core::{QueryState, StockQuery};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::engine::QueryEngine;

/// Owns the in-flight query task and publishes its state.
pub struct QuerySession {
    engine: Arc<QueryEngine>,
    state_tx: watch::Sender<QueryState>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl QuerySession {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        let (state_tx, _) = watch::channel(QueryState::Idle);
        Self { engine, state_tx, generation: Arc::new(AtomicU64::new(0)), task: None }
    }

    /// Current state snapshot.
    pub fn state(&self) -> QueryState {
        self.state_tx.borrow().clone()
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state_tx.subscribe()
    }

    /// Generation of the most recent submission (0 before any).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a query, cancelling any query still in flight.
    ///
    /// Invalid queries go straight to `Error` without entering `Loading`.
    /// Returns the generation assigned to this submission.
    pub fn submit(&mut self, query: StockQuery) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = query.validate() {
            warn!(generation, "rejected query: {e}");
            self.state_tx.send_replace(QueryState::Error { generation, message: e.to_string() });
            return generation;
        }

        info!(
            generation,
            stock = %query.stock_code,
            start = %query.start_date,
            end = %query.end_date,
            "query submitted"
        );
        self.state_tx.send_replace(QueryState::Loading { generation, query: query.clone() });

        let engine = Arc::clone(&self.engine);
        let current = Arc::clone(&self.generation);
        let state_tx = self.state_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let next = match engine.run(&query).await {
                Ok(result) => QueryState::Success { generation, result: Arc::new(result) },
                Err(e) => QueryState::Error { generation, message: e.to_string() },
            };
            // The check runs under the channel's write lock, so a newer
            // submission cannot interleave between check and publish.
            let published = state_tx.send_if_modified(|state| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *state = next;
                true
            });
            if !published {
                info!(generation, "discarding superseded query result");
            }
        }));
        generation
    }

    /// Wait until the latest submission settles and return its state.
    pub async fn wait_settled(&self) -> QueryState {
        let mut rx = self.subscribe();
        let target = self.generation();
        match rx.wait_for(|s| s.is_settled() && s.generation() == Some(target)).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Abort any in-flight query and return to `Idle`.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state_tx.send_replace(QueryState::Idle);
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
