//! Remote data source: authorized reads that fail open.
//!
//! Two operations sit on top of the retry layer and session manager:
//!
//! - [`PlantFetcher::list_plants`] — one authorized call; on an
//!   authorization failure it refreshes the session and retries exactly
//!   once more; a second rejection fails open to an empty list. Callers
//!   must treat an empty list as ambiguous (no plants, or persistent
//!   failure) and must not use it to delete existing entities.
//! - [`PlantFetcher::plant_details`] — one authorized call per plant;
//!   failures return `None` and are logged, never aborting the batch.

use std::sync::Arc;

use tracing::{debug, error, warn};

use plantsync_types::RemotePlant;

use crate::error::Error;
use crate::retry::{RetryConfig, retry_or_none, with_retry};
use crate::session::SessionManager;
use crate::traits::RemoteApi;

/// Read-side of the remote API, with retry and re-authentication.
pub struct PlantFetcher<A: RemoteApi> {
    api: Arc<A>,
    retry: RetryConfig,
}

impl<A: RemoteApi> PlantFetcher<A> {
    /// Create a fetcher over the given API.
    pub fn new(api: Arc<A>, retry: RetryConfig) -> Self {
        Self { api, retry }
    }

    /// Fetch the account's plant list, refreshing the session on an
    /// authorization failure. Fails open to an empty list.
    pub async fn list_plants(&self, session: &mut SessionManager<A>) -> Vec<RemotePlant> {
        let token = match session.token() {
            Ok(token) => token,
            Err(_) => {
                warn!("no access token available, skipping plant fetch");
                return Vec::new();
            }
        };

        match with_retry(&self.retry, "list_plants", || self.api.list_plants(&token)).await {
            Ok(plants) => plants,
            Err(Error::Unauthorized) => self.relist_with_fresh_session(session).await,
            Err(e) => {
                warn!("failed to list plants, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Refresh the session and retry the list call exactly once more.
    async fn relist_with_fresh_session(&self, session: &mut SessionManager<A>) -> Vec<RemotePlant> {
        if let Err(e) = session.ensure_valid().await {
            error!("re-authentication failed: {}", e);
            return Vec::new();
        }
        let token = match session.token() {
            Ok(token) => token,
            Err(_) => return Vec::new(),
        };
        match self.api.list_plants(&token).await {
            Ok(plants) => plants,
            Err(e) => {
                // A second rejection is not retried further.
                warn!("plant list still failing after refresh: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch measurement detail for one plant. Failures return `None` so
    /// one bad plant never blocks processing of its siblings.
    pub async fn plant_details(
        &self,
        session: &SessionManager<A>,
        plant_id: &str,
    ) -> Option<RemotePlant> {
        let token = session.token().ok()?;
        debug!("fetching details for plant {}", plant_id);
        retry_or_none(&self.retry, "plant_details", || {
            self.api.plant_details(&token, plant_id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use crate::session::authenticate;
    use plantsync_types::{PlantId, RemotePlant};
    use std::time::Duration;

    fn plant(id: i64, nickname: &str) -> RemotePlant {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "nickname": nickname,
            "sensor": {"has_sensor": true},
        }))
        .unwrap()
    }

    async fn fetcher_with_session(
        api: Arc<MockApi>,
    ) -> (PlantFetcher<MockApi>, SessionManager<MockApi>) {
        let session = authenticate(api.as_ref(), "user@example.com", "secret")
            .await
            .unwrap();
        let manager = SessionManager::new(Arc::clone(&api), session);
        let retry = RetryConfig::new(3).base_delay(Duration::from_millis(1));
        (PlantFetcher::new(api, retry), manager)
    }

    #[tokio::test]
    async fn test_list_plants_happy_path() {
        let api = Arc::new(MockApi::new());
        api.set_plants(vec![plant(7, "Fern")]);
        let (fetcher, mut session) = fetcher_with_session(Arc::clone(&api)).await;

        let plants = fetcher.list_plants(&mut session).await;
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].id, Some(PlantId::Number(7)));
    }

    #[tokio::test]
    async fn test_list_plants_reauthenticates_once_on_401() {
        let api = Arc::new(MockApi::new());
        api.set_plants(vec![plant(7, "Fern")]);
        let (fetcher, mut session) = fetcher_with_session(Arc::clone(&api)).await;

        // Expire the token server-side; the next list call 401s.
        api.invalidate_token();
        let plants = fetcher.list_plants(&mut session).await;

        assert_eq!(plants.len(), 1);
        assert_eq!(api.login_calls(), 2);
        // one rejected call + one retried with the fresh token
        assert_eq!(api.list_calls(), 2);
        assert!(session.take_dirty());
    }

    #[tokio::test]
    async fn test_list_plants_fails_open_when_reauth_fails() {
        let api = Arc::new(MockApi::new());
        api.set_plants(vec![plant(7, "Fern")]);
        let (fetcher, mut session) = fetcher_with_session(Arc::clone(&api)).await;

        api.invalidate_token();
        api.reject_logins();
        let plants = fetcher.list_plants(&mut session).await;
        assert!(plants.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_plants_retries_timeouts() {
        let api = Arc::new(MockApi::new());
        api.set_plants(vec![plant(7, "Fern")]);
        let (fetcher, mut session) = fetcher_with_session(Arc::clone(&api)).await;

        api.queue_list_timeout();
        api.queue_list_timeout();
        let plants = fetcher.list_plants(&mut session).await;
        assert_eq!(plants.len(), 1);
        assert_eq!(api.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_list_plants_without_token_is_empty() {
        let api = Arc::new(MockApi::new());
        api.set_plants(vec![plant(7, "Fern")]);
        let session = crate::session::Session::new("user@example.com", "secret");
        let mut manager = SessionManager::new(Arc::clone(&api), session);
        let fetcher = PlantFetcher::new(Arc::clone(&api), RetryConfig::none());

        let plants = fetcher.list_plants(&mut manager).await;
        assert!(plants.is_empty());
        assert_eq!(api.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_plant_details_failure_returns_none() {
        let api = Arc::new(MockApi::new());
        api.set_detail("7", plant(7, "Fern"));
        api.fail_detail("8");
        let (fetcher, session) = fetcher_with_session(Arc::clone(&api)).await;

        assert!(fetcher.plant_details(&session, "7").await.is_some());
        assert!(fetcher.plant_details(&session, "8").await.is_none());
        assert!(fetcher.plant_details(&session, "9").await.is_none());
    }
}
