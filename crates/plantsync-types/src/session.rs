//! Account session state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plant::AuthResponse;

/// Account credentials plus the current bearer-token state.
///
/// Exactly one live session exists per process. The serialized form is
/// the credentials file shape and must stay compatible with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Locally generated account id.
    pub id: String,
    /// Account email.
    pub email: String,
    /// Account password, kept for reactive re-authentication.
    pub password: String,
    /// Current bearer token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token as issued; stored but not proactively used.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds as issued; informational only.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl Session {
    /// Create an unauthenticated session for the given credentials.
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            access_token: None,
            refresh_token: None,
            expires_in: None,
        }
    }

    /// Whether this session holds a bearer token.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Replace token state from a fresh login exchange.
    pub fn apply_tokens(&mut self, auth: AuthResponse) {
        self.access_token = Some(auth.access_token);
        self.refresh_token = auth.refresh_token;
        self.expires_in = auth.expires_in;
    }
}
