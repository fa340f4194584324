//! Network reachability probe.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};

/// Default probe timeout. Deliberately shorter than the data-call
/// timeout: the probe gates scheduled work and must answer quickly.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cheap reachability check against the remote service host.
///
/// The probe issues a GET against the host root with a short timeout.
/// Any HTTP response — including error statuses — counts as reachable;
/// only failing to reach the host at all counts as unreachable.
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    client: Client,
    url: String,
}

impl NetworkProbe {
    /// Create a probe for the given host URL.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Request)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// The URL this probe targets.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the service host is currently reachable.
    pub async fn is_reachable(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("probe of {} failed: {}", self.url, e);
                false
            }
        }
    }
}

/// Reduce an API base URL to its host root for probing.
///
/// `https://host.example/api/v1` becomes `https://host.example`.
#[must_use]
pub fn host_root(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    match trimmed.find("://") {
        Some(scheme_end) => {
            let rest = &trimmed[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => trimmed[..scheme_end + 3 + path_start].to_string(),
                None => trimmed.to_string(),
            }
        }
        None => trimmed.to_string(),
    }
}
