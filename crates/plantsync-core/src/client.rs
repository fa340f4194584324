//! HTTP client for the remote plant telemetry API.
//!
//! Three endpoints, JSON over HTTPS:
//!
//! - `POST {base}/auth/login` — exchange credentials for bearer tokens
//! - `GET {base}/user-plant` — list all plants on the account
//! - `GET {base}/user-plant/{id}` — full measurement detail for one plant
//!
//! Data calls carry a 10 second timeout; the reachability probe uses its
//! own 5 second budget against the host root.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use plantsync_types::{AuthResponse, PlantList, PlantWrapper, RemotePlant};

use crate::error::{Error, Result};
use crate::probe::{DEFAULT_PROBE_TIMEOUT, NetworkProbe, host_root};
use crate::traits::RemoteApi;

/// Default base URL of the telemetry API.
pub const DEFAULT_BASE_URL: &str = "https://web.fyta.de/api";

/// Default timeout for data calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the plant telemetry API.
#[derive(Debug, Clone)]
pub struct CloudClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    probe: NetworkProbe,
}

impl CloudClient {
    /// Create a client for the default API endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client for a custom base URL (used by tests and staging).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_timeouts(base_url, DEFAULT_REQUEST_TIMEOUT, DEFAULT_PROBE_TIMEOUT)
    }

    /// Create a client with custom timeouts.
    pub fn with_timeouts(
        base_url: &str,
        request_timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::payload(format!(
                "base URL must start with http:// or https://, got: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(Error::Request)?;
        let probe = NetworkProbe::new(&host_root(&base_url), probe_timeout)?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
            probe,
        })
    }

    /// The base URL this client targets.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_body<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::payload(format!("{operation}: {e}")))
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|e| e.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| status.to_string())
    }
}

#[async_trait]
impl RemoteApi for CloudClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        info!("authenticating with telemetry service");
        let url = format!("{}/auth/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::from_request("login", self.request_timeout, e))?;

        let status = response.status();
        if status.is_success() {
            self.read_body("login", response).await
        } else if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            Err(Error::credential(Self::error_message(response).await))
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            })
        }
    }

    async fn list_plants(&self, token: &str) -> Result<Vec<RemotePlant>> {
        let url = format!("{}/user-plant", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::from_request("list_plants", self.request_timeout, e))?;

        let status = response.status();
        if status.is_success() {
            let list: PlantList = self.read_body("list_plants", response).await?;
            debug!("retrieved {} plants", list.plants.len());
            Ok(list.plants)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(Error::Unauthorized)
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            })
        }
    }

    async fn plant_details(&self, token: &str, plant_id: &str) -> Result<RemotePlant> {
        let url = format!("{}/user-plant/{}", self.base_url, plant_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::from_request("plant_details", self.request_timeout, e))?;

        let status = response.status();
        if status.is_success() {
            let detail: PlantWrapper = self.read_body("plant_details", response).await?;
            Ok(detail.plant)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(Error::Unauthorized)
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            })
        }
    }

    async fn is_reachable(&self) -> bool {
        self.probe.is_reachable().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CloudClient::with_base_url("https://telemetry.example/api").unwrap();
        assert_eq!(client.base_url(), "https://telemetry.example/api");
    }

    #[test]
    fn test_client_normalizes_trailing_slash() {
        let client = CloudClient::with_base_url("https://telemetry.example/api/").unwrap();
        assert_eq!(client.base_url(), "https://telemetry.example/api");
    }

    #[test]
    fn test_client_rejects_bad_scheme() {
        let result = CloudClient::with_base_url("telemetry.example/api");
        assert!(matches!(result, Err(Error::Payload(_))));
    }

    #[test]
    fn test_probe_targets_host_root() {
        let client = CloudClient::with_base_url("https://telemetry.example/api").unwrap();
        assert_eq!(client.probe.url(), "https://telemetry.example");
    }
}
