//! One-shot fetch orchestration.
//!
//! The hosting shell (the terminal app or the `summary` command) starts a
//! single fetch with [`spawn_initial_fetch`] and receives a typed
//! [`FetchOutcome`] over a oneshot channel. Applying that outcome to a
//! [`Dashboard`] is the only place where tallies and projections are
//! recomputed.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::aggregate::Summary;
use crate::error::{DashError, Result};
use crate::model::{validate_rows, RowRejection, ServerRecord};
use crate::store::RemoteStore;

/// Validated rows from one successful fetch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<ServerRecord>,
    pub rejected: Vec<RowRejection>,
}

/// Result of the one-shot fetch, as delivered to the shell.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(Snapshot),
    Failed(DashError),
}

impl From<Result<Snapshot>> for FetchOutcome {
    fn from(result: Result<Snapshot>) -> Self {
        match result {
            Ok(snapshot) => FetchOutcome::Loaded(snapshot),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Read `table` and validate its rows.
pub async fn fetch_snapshot(store: &dyn RemoteStore, table: &str) -> Result<Snapshot> {
    let start = Instant::now();
    let rows = store.select_all(table).await?;
    let total = rows.len();
    let (records, rejected) = validate_rows(rows);

    for rejection in &rejected {
        warn!(table, %rejection, "dropping malformed row");
    }
    info!(
        table,
        rows = total,
        accepted = records.len(),
        rejected = rejected.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "fetched server records"
    );

    Ok(Snapshot { records, rejected })
}

/// Start the single initial fetch on the runtime.
///
/// The receiver yields exactly one outcome. If the task is dropped before
/// finishing the receiver reports a closed channel, which the shell treats
/// as a failed fetch.
pub fn spawn_initial_fetch(
    store: Arc<dyn RemoteStore>,
    table: String,
) -> oneshot::Receiver<FetchOutcome> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = FetchOutcome::from(fetch_snapshot(store.as_ref(), &table).await);
        // Receiver gone means the shell already quit
        let _ = tx.send(outcome);
    });
    rx
}

/// Lifecycle of the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Dashboard state: the current snapshot, its summary, and fetch status.
#[derive(Debug, Clone)]
pub struct Dashboard {
    phase: FetchPhase,
    records: Vec<ServerRecord>,
    summary: Summary,
    rejected: usize,
    error: Option<String>,
    stale: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            phase: FetchPhase::Idle,
            records: Vec::new(),
            summary: Summary::default(),
            rejected: 0,
            error: None,
            stale: false,
        }
    }

    /// Enter the loading state. Returns `false` if a fetch is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.phase == FetchPhase::Loading {
            return false;
        }
        self.phase = FetchPhase::Loading;
        self.error = None;
        true
    }

    /// Apply a fetch outcome. Ignored unless a fetch is loading.
    ///
    /// On failure the previous snapshot stays in place and is flagged stale.
    pub fn complete(&mut self, outcome: FetchOutcome) {
        if self.phase != FetchPhase::Loading {
            warn!(phase = ?self.phase, "ignoring fetch outcome outside of loading state");
            return;
        }

        match outcome {
            FetchOutcome::Loaded(snapshot) => {
                self.summary = Summary::from_records(&snapshot.records);
                self.records = snapshot.records;
                self.rejected = snapshot.rejected.len();
                self.error = None;
                self.stale = false;
                self.phase = FetchPhase::Success;
            }
            FetchOutcome::Failed(err) => {
                warn!(error = %err, "fetch failed");
                self.error = Some(err.banner());
                self.stale = !self.records.is_empty();
                self.phase = FetchPhase::Error;
            }
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn records(&self) -> &[ServerRecord] {
        &self.records
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Banner text of the last failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rows the last successful fetch dropped during validation.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// True when the shown data predates a failed fetch.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}
