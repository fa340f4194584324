//! The synchronization engine: one full poll cycle.
//!
//! [`SyncEngine`] composes the session manager, the plant fetcher, and
//! the reconciler into a single owned state machine. One call to
//! [`SyncEngine::sync_once`] performs list → per-plant details →
//! reconcile, and reports what changed so the service layer can persist
//! the session and entity snapshot and publish updated attributes.
//!
//! Nothing here returns an error: every failure degrades to "no change"
//! and is logged.

use std::sync::Arc;

use tracing::{info, warn};

use plantsync_types::{EntitySet, RemotePlant};

use crate::fetch::PlantFetcher;
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::retry::RetryConfig;
use crate::session::{Session, SessionManager};
use crate::traits::RemoteApi;

/// Result of one synchronization pass.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// Plants returned by the list call.
    pub plants_listed: usize,
    /// Whether the session's tokens were refreshed during the pass and
    /// must be persisted.
    pub session_refreshed: bool,
    /// What reconciliation did.
    pub reconcile: ReconcileOutcome,
}

impl SyncOutcome {
    /// Whether the entity set changed and should be persisted.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.reconcile.changed()
    }
}

/// Owned state of the synchronization core.
pub struct SyncEngine<A: RemoteApi> {
    api: Arc<A>,
    session: SessionManager<A>,
    fetcher: PlantFetcher<A>,
    reconciler: Reconciler,
}

impl<A: RemoteApi> SyncEngine<A> {
    /// Build an engine from a session and a previously persisted entity
    /// set (empty on first run).
    pub fn new(api: Arc<A>, session: Session, retry: RetryConfig, entities: EntitySet) -> Self {
        Self {
            session: SessionManager::new(Arc::clone(&api), session),
            fetcher: PlantFetcher::new(Arc::clone(&api), retry),
            reconciler: Reconciler::with_entities(entities),
            api,
        }
    }

    /// The current entity set.
    #[must_use]
    pub fn entities(&self) -> &EntitySet {
        self.reconciler.entities()
    }

    /// The current session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        self.session.session()
    }

    /// Whether the remote service is currently reachable.
    pub async fn is_reachable(&self) -> bool {
        self.api.is_reachable().await
    }

    /// Run one full synchronization pass.
    pub async fn sync_once(&mut self) -> SyncOutcome {
        let plants = self.fetcher.list_plants(&mut self.session).await;
        info!("listed {} plants", plants.len());

        let mut details = Vec::with_capacity(plants.len());
        for summary in &plants {
            if !summary.has_sensor() {
                continue;
            }
            let Some(id) = &summary.id else {
                warn!("plant {} has no id, skipping", summary.display_nickname());
                continue;
            };
            match self.fetcher.plant_details(&self.session, &id.to_string()).await {
                Some(detail) => details.push(merge_summary(detail, summary)),
                None => warn!(
                    "could not get details for plant {}, skipping",
                    summary.display_nickname()
                ),
            }
        }

        let reconcile = self.reconciler.reconcile(&details);
        SyncOutcome {
            plants_listed: plants.len(),
            session_refreshed: self.session.take_dirty(),
            reconcile,
        }
    }
}

/// Fill fields the detail endpoint omits from the list-level summary.
fn merge_summary(mut detail: RemotePlant, summary: &RemotePlant) -> RemotePlant {
    if detail.id.is_none() {
        detail.id = summary.id.clone();
    }
    if detail.nickname.is_none() {
        detail.nickname = summary.nickname.clone();
    }
    if detail.scientific_name.is_none() {
        detail.scientific_name = summary.scientific_name.clone();
    }
    match (&mut detail.sensor, &summary.sensor) {
        (Some(d), Some(s)) => d.has_sensor = d.has_sensor || s.has_sensor,
        (None, Some(s)) => detail.sensor = Some(s.clone()),
        _ => {}
    }
    detail
}
