//! Shared state handed to every handler through an `Extension`.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::session::SessionStore;

pub const DEMO_USERNAME: &str = "alice";
pub const DEMO_PASSWORD: &str = "bob";

/// The single account accepted by the login form.
#[derive(Clone, Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: String, password: SecretString) -> Self {
        Self { username, password }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exact match on both fields.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password.expose_secret() == password
    }

    /// Whether the account is the well-known demo one, which the login page may advertise.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.matches(DEMO_USERNAME, DEMO_PASSWORD)
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(
            DEMO_USERNAME.to_string(),
            SecretString::from(DEMO_PASSWORD.to_string()),
        )
    }
}

#[derive(Debug)]
pub struct AppState {
    store: Arc<SessionStore>,
    credentials: Credentials,
    secure_cookie: bool,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<SessionStore>, credentials: Credentials) -> Self {
        Self {
            store,
            credentials,
            secure_cookie: false,
        }
    }

    #[must_use]
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn store_handle(&self) -> Arc<SessionStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_credentials_match_alice_bob() {
        let credentials = Credentials::default();
        assert!(credentials.matches("alice", "bob"));
        assert!(credentials.is_demo());
        assert!(!credentials.matches("alice", "bobby"));
        assert!(!credentials.matches("Alice", "bob"));
        assert!(!credentials.matches("", ""));
    }

    #[test]
    fn custom_credentials_are_not_demo() {
        let credentials =
            Credentials::new("carol".to_string(), SecretString::from("s3cret".to_string()));
        assert!(credentials.matches("carol", "s3cret"));
        assert!(!credentials.is_demo());
        assert_eq!(credentials.username(), "carol");
    }

    #[test]
    fn state_defaults_to_bare_cookie() {
        let state = AppState::new(Arc::new(SessionStore::new()), Credentials::default());
        assert!(!state.secure_cookie());
        assert!(state.with_secure_cookie(true).secure_cookie());
    }
}
