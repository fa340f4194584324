//! Mock remote API for testing.
//!
//! Implements [`RemoteApi`] without any network access, with the knobs
//! the engine tests need: failure injection per operation, token
//! invalidation to exercise the re-authentication path, and call
//! counters.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use plantsync_types::{AuthResponse, RemotePlant};

use crate::error::{Error, Result};
use crate::traits::RemoteApi;

/// A mock telemetry service.
///
/// Logins issue a fresh token each time; data calls reject any token
/// other than the most recently issued one, which makes expiry scenarios
/// easy to drive with [`MockApi::invalidate_token`].
#[derive(Default)]
pub struct MockApi {
    plants: Mutex<Vec<RemotePlant>>,
    details: Mutex<HashMap<String, RemotePlant>>,
    current_token: Mutex<Option<String>>,
    reject_logins: AtomicBool,
    reachable: AtomicBool,
    /// Errors handed out by `list_plants` before it starts succeeding.
    queued_list_errors: Mutex<Vec<Error>>,
    /// Plant ids whose detail fetch fails.
    failing_details: Mutex<Vec<String>>,
    login_count: AtomicU32,
    list_count: AtomicU32,
    detail_count: AtomicU32,
}

impl MockApi {
    /// Create a reachable mock with no plants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Replace the plant list returned by `list_plants`.
    pub fn set_plants(&self, plants: Vec<RemotePlant>) {
        *self.plants.lock().unwrap() = plants;
    }

    /// Set the detail payload for one plant id.
    pub fn set_detail(&self, plant_id: &str, detail: RemotePlant) {
        self.details
            .lock()
            .unwrap()
            .insert(plant_id.to_string(), detail);
    }

    /// Make all subsequent logins fail with a credential error.
    pub fn reject_logins(&self) {
        self.reject_logins.store(true, Ordering::SeqCst);
    }

    /// Control the reachability probe.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Drop the currently valid token so data calls 401 until the next
    /// login.
    pub fn invalidate_token(&self) {
        *self.current_token.lock().unwrap() = None;
    }

    /// Queue an error to be returned by the next `list_plants` call.
    /// Queued errors are consumed in order before normal responses resume.
    pub fn queue_list_error(&self, error: Error) {
        self.queued_list_errors.lock().unwrap().push(error);
    }

    /// Queue a timeout for the next `list_plants` call.
    pub fn queue_list_timeout(&self) {
        self.queue_list_error(Error::timeout("list_plants", Duration::from_secs(10)));
    }

    /// Make detail fetches for this plant id fail.
    pub fn fail_detail(&self, plant_id: &str) {
        self.failing_details
            .lock()
            .unwrap()
            .push(plant_id.to_string());
    }

    /// Number of login calls made.
    #[must_use]
    pub fn login_calls(&self) -> u32 {
        self.login_count.load(Ordering::SeqCst)
    }

    /// Number of `list_plants` calls made.
    #[must_use]
    pub fn list_calls(&self) -> u32 {
        self.list_count.load(Ordering::SeqCst)
    }

    /// Number of `plant_details` calls made.
    #[must_use]
    pub fn detail_calls(&self) -> u32 {
        self.detail_count.load(Ordering::SeqCst)
    }

    fn check_token(&self, token: &str) -> Result<()> {
        let current = self.current_token.lock().unwrap();
        match current.as_deref() {
            Some(t) if t == token => Ok(()),
            _ => Err(Error::Unauthorized),
        }
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<AuthResponse> {
        let count = self.login_count.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject_logins.load(Ordering::SeqCst) {
            return Err(Error::credential("invalid credentials"));
        }
        let token = format!("mock-token-{count}");
        *self.current_token.lock().unwrap() = Some(token.clone());
        Ok(AuthResponse {
            access_token: token,
            refresh_token: Some(format!("mock-refresh-{count}")),
            expires_in: Some(3600),
        })
    }

    async fn list_plants(&self, token: &str) -> Result<Vec<RemotePlant>> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = {
            let mut queued = self.queued_list_errors.lock().unwrap();
            if queued.is_empty() {
                None
            } else {
                Some(queued.remove(0))
            }
        } {
            return Err(error);
        }
        self.check_token(token)?;
        Ok(self.plants.lock().unwrap().clone())
    }

    async fn plant_details(&self, token: &str, plant_id: &str) -> Result<RemotePlant> {
        self.detail_count.fetch_add(1, Ordering::SeqCst);
        self.check_token(token)?;
        if self
            .failing_details
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == plant_id)
        {
            return Err(Error::Http {
                status: 500,
                message: format!("detail fetch for plant {plant_id} failed"),
            });
        }
        self.details
            .lock()
            .unwrap()
            .get(plant_id)
            .cloned()
            .ok_or_else(|| Error::Http {
                status: 404,
                message: format!("no such plant: {plant_id}"),
            })
    }

    async fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
