//! Synchronization engine for remote plant telemetry.
//!
//! This crate keeps a local set of typed sensor entities reconciled with
//! a remote plant telemetry API across restarts and network outages. It
//! favors availability of stale data over correctness of fresh data:
//! every network failure degrades to "no change", and previously known
//! values are never lost because the network went away.
//!
//! # Components
//!
//! - [`NetworkProbe`] — cheap reachability check against the service host
//! - [`SessionManager`] — credential and bearer-token lifecycle; expiry
//!   is discovered reactively via 401, never via a local clock
//! - [`with_retry`] — bounded retry of timeouts with linear backoff
//! - [`PlantFetcher`] — authorized list/detail reads that fail open
//! - [`Reconciler`] — merges fetched plants into the entity set
//! - [`SyncEngine`] — one owned state machine composing all of the above
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use plantsync_core::{CloudClient, RetryConfig, SyncEngine, authenticate};
//! use plantsync_types::EntitySet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(CloudClient::new()?);
//!     let session = authenticate(api.as_ref(), "user@example.com", "secret").await?;
//!
//!     let mut engine = SyncEngine::new(api, session, RetryConfig::default(), EntitySet::new());
//!     let outcome = engine.sync_once().await;
//!     println!("{} entities", engine.entities().len());
//!     if outcome.changed() {
//!         // persist engine.entities()
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod fetch;
pub mod mock;
pub mod probe;
pub mod reconcile;
pub mod retry;
pub mod session;
pub mod sync;
pub mod traits;

pub use client::{CloudClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{Error, Result};
pub use fetch::PlantFetcher;
pub use mock::MockApi;
pub use probe::{DEFAULT_PROBE_TIMEOUT, NetworkProbe};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use retry::{RetryConfig, retry_or_none, with_retry};
pub use session::{Session, SessionManager, authenticate};
pub use sync::{SyncEngine, SyncOutcome};
pub use traits::RemoteApi;
