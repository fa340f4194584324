//! Credential and bearer-token lifecycle.
//!
//! Exactly one live [`Session`] exists per process. It is created on the
//! first successful authentication, mutated in place on every
//! re-authentication, and must be persisted by the caller after every
//! mutation.
//!
//! No local expiry clock is consulted: a session with a token is assumed
//! valid until a request using it is rejected with an authorization
//! error, at which point [`SessionManager::ensure_valid`] re-authenticates
//! before any dependent operation proceeds. "401 on next call" is the
//! expiry signal.

use std::sync::Arc;

use tracing::info;

pub use plantsync_types::Session;

use crate::error::{Error, Result};
use crate::traits::RemoteApi;

/// Perform the login exchange and build a session from the result.
///
/// Credentials must be non-empty; a rejected login surfaces as
/// [`Error::Credential`] and must not be retried automatically.
pub async fn authenticate<A: RemoteApi>(api: &A, email: &str, password: &str) -> Result<Session> {
    if email.is_empty() || password.is_empty() {
        return Err(Error::credential("email and password are required"));
    }
    let auth = api.login(email, password).await?;
    let mut session = Session::new(email, password);
    session.apply_tokens(auth);
    info!("authenticated account {}", session.id);
    Ok(session)
}

/// Owner of the one live session.
///
/// All token mutation goes through this struct; callers read the session
/// but never write it directly. The `dirty` flag records that tokens
/// changed since the last persist so the service layer knows to save.
pub struct SessionManager<A: RemoteApi> {
    api: Arc<A>,
    session: Session,
    dirty: bool,
}

impl<A: RemoteApi> SessionManager<A> {
    /// Wrap an existing (typically loaded-from-disk) session.
    pub fn new(api: Arc<A>, session: Session) -> Self {
        Self {
            api,
            session,
            dirty: false,
        }
    }

    /// The current session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The current bearer token, or [`Error::NotAuthenticated`].
    pub fn token(&self) -> Result<String> {
        self.session
            .access_token
            .clone()
            .ok_or(Error::NotAuthenticated)
    }

    /// Re-authenticate with the stored credentials, replacing the token
    /// state in place.
    ///
    /// This is the only automatic re-authentication path, invoked when a
    /// downstream call reports an authorization failure. The caller must
    /// persist the session immediately after a successful refresh (see
    /// [`Self::take_dirty`]).
    pub async fn ensure_valid(&mut self) -> Result<()> {
        info!("access token rejected, re-authenticating");
        let auth = self
            .api
            .login(&self.session.email, &self.session.password)
            .await?;
        self.session.apply_tokens(auth);
        self.dirty = true;
        Ok(())
    }

    /// Whether tokens changed since the last persist, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;

    #[tokio::test]
    async fn test_authenticate_rejects_empty_credentials() {
        let api = MockApi::new();
        let result = authenticate(&api, "", "secret").await;
        assert!(matches!(result, Err(Error::Credential(_))));
        assert_eq!(api.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_populates_tokens() {
        let api = MockApi::new();
        let session = authenticate(&api, "user@example.com", "secret")
            .await
            .unwrap();
        assert!(session.has_token());
        assert_eq!(session.email, "user@example.com");
        assert_eq!(api.login_calls(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_surfaces_bad_credentials() {
        let api = MockApi::new();
        api.reject_logins();
        let result = authenticate(&api, "user@example.com", "wrong").await;
        assert!(matches!(result, Err(Error::Credential(_))));
    }

    #[tokio::test]
    async fn test_ensure_valid_replaces_tokens_and_marks_dirty() {
        let api = Arc::new(MockApi::new());
        let session = authenticate(api.as_ref(), "user@example.com", "secret")
            .await
            .unwrap();
        let first_token = session.access_token.clone().unwrap();

        let mut manager = SessionManager::new(Arc::clone(&api), session);
        assert!(!manager.take_dirty());

        manager.ensure_valid().await.unwrap();
        assert_ne!(
            manager.session().access_token.as_ref().unwrap(),
            &first_token
        );
        assert!(manager.take_dirty());
        assert!(!manager.take_dirty());
    }

    #[tokio::test]
    async fn test_token_requires_authentication() {
        let api = Arc::new(MockApi::new());
        let manager = SessionManager::new(api, Session::new("a@b.c", "p"));
        assert!(matches!(manager.token(), Err(Error::NotAuthenticated)));
    }
}
