//! Explicit login session shared with the client.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Profile returned alongside a token on login.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserInfo>,
}

/// Holds the bearer token used by [`ApiClient`](crate::ApiClient).
///
/// Cloning a `Session` yields a handle to the same state, so the caller can
/// keep one handle to log out while the client holds another.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    /// An anonymous session. Public endpoints work without a token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session seeded with an existing token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.inner.write().token = Some(token.into());
        session
    }

    /// Current token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// Profile of the logged-in user, if the login response carried one.
    pub fn user(&self) -> Option<UserInfo> {
        self.inner.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().token.is_some()
    }

    /// Store the result of a successful login.
    pub fn establish(&self, token: String, user: Option<UserInfo>) {
        let mut state = self.inner.write();
        state.token = Some(token);
        state.user = user;
    }

    /// Forget the token and user.
    pub fn clear(&self) {
        let mut state = self.inner.write();
        state.token = None;
        state.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::anonymous();
        let handle = session.clone();

        session.establish("tok".to_string(), None);
        assert_eq!(handle.token().as_deref(), Some("tok"));

        handle.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_with_token() {
        let session = Session::with_token("abc");
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
    }
}
