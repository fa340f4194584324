//! Startup and host-event orchestration.
//!
//! Ordering invariant: on startup the persisted entity set is published
//! to the host before any network activity, so the system is usable
//! offline. Refreshes triggered by startup and by host connect events
//! are fire-and-forget background tasks; host events are acknowledged
//! without waiting on the network.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use plantsync_core::{RemoteApi, SyncEngine, SyncOutcome};

use crate::host::{AttributeUpdate, HostBridge, HostEvent};
use crate::state::AppState;

/// What happened when a synchronization pass was requested.
#[derive(Debug)]
pub enum PassResult {
    /// The pass ran to completion.
    Completed(SyncOutcome),
    /// The remote host was unreachable; the entity set was not touched.
    SkippedUnreachable,
    /// Another pass was already in flight; this trigger was coalesced.
    SkippedBusy,
}

/// Drives synchronization passes and reacts to host events.
pub struct Orchestrator<A: RemoteApi> {
    state: Arc<AppState<A>>,
    host: Arc<dyn HostBridge>,
    cancel: CancellationToken,
}

impl<A: RemoteApi> Clone for Orchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            host: Arc::clone(&self.host),
            cancel: self.cancel.clone(),
        }
    }
}

impl<A: RemoteApi + 'static> Orchestrator<A> {
    /// Create an orchestrator.
    pub fn new(
        state: Arc<AppState<A>>,
        host: Arc<dyn HostBridge>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            state,
            host,
            cancel,
        }
    }

    /// Publish the persisted entity set to the host, then kick off a
    /// background refresh.
    pub async fn startup(&self) {
        {
            let engine = self.state.engine.lock().await;
            let entities = engine.entities();
            info!("publishing {} persisted entities", entities.len());
            for entity in entities.iter() {
                self.host.add(entity).await;
                self.host
                    .update_attributes(entity.id(), AttributeUpdate::from_entity(entity))
                    .await;
            }
        }
        self.spawn_refresh("startup");
    }

    /// React to a host event. Never blocks on the network.
    pub async fn handle_event(&self, event: HostEvent) {
        match event {
            HostEvent::Connect => {
                debug!("host connected");
                self.spawn_refresh("connect");
            }
            HostEvent::Disconnect => {
                debug!("host disconnected");
            }
            HostEvent::Subscribe(ids) => {
                self.publish_cached(&ids).await;
            }
        }
    }

    /// Push the cached value of each subscribed entity immediately.
    async fn publish_cached(&self, ids: &[String]) {
        let engine = self.state.engine.lock().await;
        for id in ids {
            match engine.entities().get(id) {
                Some(entity) => {
                    self.host
                        .update_attributes(id, AttributeUpdate::from_entity(entity))
                        .await;
                }
                None => warn!("subscribe for unknown entity {id}"),
            }
        }
    }

    /// Run a refresh in the background, supervised by the cancel token.
    fn spawn_refresh(&self, reason: &'static str) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = this.cancel.cancelled() => {
                    debug!("{reason} refresh cancelled");
                }
                result = this.sync_now() => {
                    debug!("{reason} refresh finished: {result:?}");
                }
            }
        });
    }

    /// Run one synchronization pass now, unless one is already running
    /// or the remote host is unreachable.
    pub async fn sync_now(&self) -> PassResult {
        let Ok(mut engine) = self.state.engine.try_lock() else {
            debug!("sync already in flight, coalescing");
            self.state.stats.write().await.record_coalesced();
            return PassResult::SkippedBusy;
        };

        if !engine.is_reachable().await {
            info!("remote host unreachable, skipping sync");
            self.state.stats.write().await.record_unreachable();
            return PassResult::SkippedUnreachable;
        }

        let outcome = engine.sync_once().await;
        self.persist(&engine, &outcome).await;
        self.publish_changed(&engine, &outcome).await;
        self.state.stats.write().await.record_pass(&outcome);
        PassResult::Completed(outcome)
    }

    /// Persist session and entity snapshot as the pass reported.
    /// Persistence failures are logged, never fatal to the loop.
    async fn persist(&self, engine: &SyncEngine<A>, outcome: &SyncOutcome) {
        let store = self.state.store.lock().await;
        if outcome.session_refreshed
            && let Err(e) = store.save_session(engine.session())
        {
            error!("failed to persist refreshed session: {e}");
        }
        if outcome.changed()
            && let Err(e) = store.save_entities(engine.entities())
        {
            error!("failed to persist entity snapshot: {e}");
        }
    }

    /// Advertise created entities and push updated attributes.
    async fn publish_changed(&self, engine: &SyncEngine<A>, outcome: &SyncOutcome) {
        for id in &outcome.reconcile.changed_ids {
            let Some(entity) = engine.entities().get(id) else {
                continue;
            };
            if !self.host.contains(id).await {
                self.host.add(entity).await;
            }
            self.host
                .update_attributes(id, AttributeUpdate::from_entity(entity))
                .await;
        }
    }
}
