//! Trait abstraction over the remote telemetry API.
//!
//! [`RemoteApi`] is the seam between the synchronization engine and the
//! network: the HTTP client implements it for production, and the mock in
//! [`crate::mock`] implements it for tests.

use async_trait::async_trait;

use plantsync_types::{AuthResponse, RemotePlant};

use crate::error::Result;

/// Operations the remote telemetry service exposes.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Exchange account credentials for bearer tokens.
    ///
    /// Bad credentials surface as [`crate::Error::Credential`] and must
    /// not be retried automatically.
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse>;

    /// Fetch the account's plant list (summaries).
    ///
    /// A rejected token surfaces as [`crate::Error::Unauthorized`].
    async fn list_plants(&self, token: &str) -> Result<Vec<RemotePlant>>;

    /// Fetch full measurement detail for one plant.
    async fn plant_details(&self, token: &str, plant_id: &str) -> Result<RemotePlant>;

    /// Cheap reachability check against the service host.
    ///
    /// Any response counts as reachable; only transport-level failure to
    /// reach the host counts as unreachable.
    async fn is_reachable(&self) -> bool;
}
