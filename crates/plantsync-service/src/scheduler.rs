//! Periodic synchronization scheduler.
//!
//! A fixed-interval loop that asks the orchestrator for a pass on each
//! tick. Unreachable hosts and in-flight passes are skipped, never
//! queued; nothing that happens on a tick stops the loop. The loop ends
//! only when the cancellation token fires.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use plantsync_core::RemoteApi;

use crate::orchestrator::{Orchestrator, PassResult};

/// Periodic driver of reconciliation passes.
pub struct Scheduler<A: RemoteApi> {
    orchestrator: Orchestrator<A>,
    interval: Duration,
    cancel: CancellationToken,
}

impl<A: RemoteApi + 'static> Scheduler<A> {
    /// Create a scheduler with the given tick interval.
    pub fn new(
        orchestrator: Orchestrator<A>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            orchestrator,
            interval,
            cancel,
        }
    }

    /// Spawn the scheduler loop.
    ///
    /// The first pass happens one full interval after spawn; the startup
    /// refresh covers the time before that.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("scheduler started, interval {:?}", self.interval);
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval's first tick completes immediately.
            timer.tick().await;

            loop {
                tokio::select! {
                    () = self.cancel.cancelled() => {
                        info!("scheduler stopping");
                        break;
                    }
                    _ = timer.tick() => {
                        match self.orchestrator.sync_now().await {
                            PassResult::Completed(outcome) => {
                                debug!(
                                    "scheduled pass: {} plants, changed={}",
                                    outcome.plants_listed,
                                    outcome.changed()
                                );
                            }
                            PassResult::SkippedUnreachable => {
                                debug!("scheduled pass skipped: unreachable");
                            }
                            PassResult::SkippedBusy => {
                                debug!("scheduled pass skipped: sync in flight");
                            }
                        }
                    }
                }
            }
        })
    }
}
