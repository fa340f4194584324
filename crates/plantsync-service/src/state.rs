//! Application state shared across the scheduler and orchestrator.
//!
//! The sync engine lives behind a `tokio::sync::Mutex`; this is the
//! single-flight guard for reconciliation. Whoever wants to run a pass
//! uses `try_lock` and skips when a pass is already in flight, so
//! overlapping triggers (a scheduler tick during a connect refresh)
//! coalesce instead of queueing.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};

use plantsync_core::{RemoteApi, SyncEngine, SyncOutcome};
use plantsync_store::Store;

/// Shared application state.
pub struct AppState<A: RemoteApi> {
    /// The sync engine. The mutex serializes reconciliation passes.
    pub engine: Mutex<SyncEngine<A>>,
    /// The persistence store.
    pub store: Mutex<Store>,
    /// Per-pass statistics.
    pub stats: RwLock<SyncStats>,
}

impl<A: RemoteApi> AppState<A> {
    /// Create new application state.
    pub fn new(engine: SyncEngine<A>, store: Store) -> Arc<Self> {
        Arc::new(Self {
            engine: Mutex::new(engine),
            store: Mutex::new(store),
            stats: RwLock::new(SyncStats::default()),
        })
    }
}

/// Statistics across synchronization passes.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// When the last completed pass finished.
    pub last_sync: Option<OffsetDateTime>,
    /// When the entity set last changed.
    pub last_change: Option<OffsetDateTime>,
    /// Completed passes.
    pub passes: u64,
    /// Completed passes that changed the entity set.
    pub passes_with_changes: u64,
    /// Passes skipped because the remote host was unreachable.
    pub skipped_unreachable: u64,
    /// Triggers dropped because a pass was already in flight.
    pub coalesced: u64,
    /// Plants listed by the most recent pass.
    pub last_plants_listed: usize,
}

impl SyncStats {
    /// Record a completed pass.
    pub fn record_pass(&mut self, outcome: &SyncOutcome) {
        let now = OffsetDateTime::now_utc();
        self.last_sync = Some(now);
        self.passes += 1;
        self.last_plants_listed = outcome.plants_listed;
        if outcome.changed() {
            self.last_change = Some(now);
            self.passes_with_changes += 1;
        }
    }

    /// Record a pass skipped for lack of connectivity.
    pub fn record_unreachable(&mut self) {
        self.skipped_unreachable += 1;
    }

    /// Record a trigger dropped because a pass was in flight.
    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }
}
