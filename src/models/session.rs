//! Caller session - who is asking, passed in explicitly.
//!
//! Credentials are never read from ambient storage by the engine. The caller
//! builds a [`Session`] (the binary does so from the environment) and hands
//! it to whatever needs it.

use serde::{Deserialize, Serialize};

use super::Subscription;

/// Authenticated user context supplied by the caller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated user
    pub user_id: i64,
    /// Bearer token issued by the backend
    pub access_token: String,
    /// Token scheme, normally "bearer"
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Creates a bearer-token session.
    #[must_use]
    pub fn new(user_id: i64, access_token: String) -> Self {
        Self {
            user_id,
            access_token,
            token_type: default_token_type(),
        }
    }

    /// Value for an HTTP `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let mut scheme = self.token_type.clone();
        if let Some(first) = scheme.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{scheme} {}", self.access_token)
    }

    /// Whether the subscription belongs to this session's user.
    #[must_use]
    pub const fn owns(&self, subscription: &Subscription) -> bool {
        subscription.user_id == self.user_id
    }

    /// The subset of a snapshot owned by this session's user.
    #[must_use]
    pub fn visible(&self, subscriptions: Vec<Subscription>) -> Vec<Subscription> {
        subscriptions
            .into_iter()
            .filter(|sub| self.owns(sub))
            .collect()
    }
}

// Keeps tokens out of logs
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_authorization_header() {
        let session = Session::new(1, "abc123".into());
        assert_eq!(session.authorization_header(), "Bearer abc123");
    }

    #[test]
    fn test_visible_filters_by_owner() {
        let session = Session::new(1, "t".into());
        let mine = Subscription::new(1, 1, "Mine".into(), dec!(10), Frequency::Monthly);
        let theirs = Subscription::new(2, 2, "Theirs".into(), dec!(10), Frequency::Monthly);

        assert!(session.owns(&mine));
        assert!(!session.owns(&theirs));

        let visible = session.visible(vec![mine, theirs]);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Mine");
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new(1, "secret-token".into());
        let printed = format!("{session:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("user_id: 1"));
    }
}
