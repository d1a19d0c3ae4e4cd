//! Process-wide session table.
//!
//! Every operation takes the same mutex, so `resolve`, `get`, `set`, `clear`,
//! `rotate` and `remove` are atomic with respect to each other. Two requests
//! racing to rotate one identifier cannot both win: the loser sees
//! [`SessionError::NotFound`].

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use thiserror::Error;
use tracing::debug;

use super::token;

/// Attribute holding the authenticated account name.
pub const USERNAME: &str = "username";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("failed to generate session identifier")]
    Entropy(#[from] rand::Error),
}

/// Attribute set of one session. No `username` means anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    attributes: HashMap<String, String>,
}

impl Session {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.get(USERNAME)
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.username().is_none()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    #[must_use]
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

impl Entry {
    fn new(now: Instant) -> Self {
        Self {
            session: Session::default(),
            last_seen: now,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    idle_timeout: Option<Duration>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop sessions that have not been touched for `timeout`.
    /// A zero duration keeps sessions forever.
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    // The table only holds plain data, a panic elsewhere cannot leave it half updated.
    fn table(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_idle(&self, entry: &Entry, now: Instant) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| now.saturating_duration_since(entry.last_seen) >= timeout)
    }

    /// Look up a live entry and mark it as used. Idle entries are evicted on the way.
    fn live<'a>(
        &self,
        table: &'a mut HashMap<String, Entry>,
        identifier: &str,
        now: Instant,
    ) -> Result<&'a mut Entry, SessionError> {
        if table
            .get(identifier)
            .is_some_and(|entry| self.is_idle(entry, now))
        {
            table.remove(identifier);
            debug!(sid_prefix = token::prefix(identifier), "idle session expired");
        }

        let entry = table.get_mut(identifier).ok_or(SessionError::NotFound)?;
        entry.last_seen = now;
        Ok(entry)
    }

    fn fresh_identifier(table: &HashMap<String, Entry>) -> Result<String, SessionError> {
        loop {
            let identifier = token::generate()?;
            if !table.contains_key(&identifier) {
                return Ok(identifier);
            }
        }
    }

    /// Return the presented identifier when it names a live session, otherwise
    /// create an empty session under a fresh identifier.
    ///
    /// The boolean is `true` when a session was created and the client has to be
    /// told about the new identifier. An unknown identifier is never adopted.
    ///
    /// # Errors
    /// Returns [`SessionError::Entropy`] if no identifier could be generated.
    pub fn resolve(&self, identifier: Option<&str>) -> Result<(String, bool), SessionError> {
        let now = Instant::now();
        let mut table = self.table();

        if let Some(identifier) = identifier.filter(|identifier| !identifier.is_empty()) {
            if self.live(&mut table, identifier, now).is_ok() {
                return Ok((identifier.to_string(), false));
            }
        }

        let identifier = Self::fresh_identifier(&table)?;
        table.insert(identifier.clone(), Entry::new(now));
        debug!(sid_prefix = token::prefix(&identifier), "session created");

        Ok((identifier, true))
    }

    /// Snapshot of the session state.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the identifier is not live.
    pub fn get(&self, identifier: &str) -> Result<Session, SessionError> {
        let mut table = self.table();
        let entry = self.live(&mut table, identifier, Instant::now())?;
        Ok(entry.session.clone())
    }

    /// # Errors
    /// Returns [`SessionError::NotFound`] if the identifier is not live.
    pub fn set(&self, identifier: &str, key: &str, value: &str) -> Result<(), SessionError> {
        let mut table = self.table();
        let entry = self.live(&mut table, identifier, Instant::now())?;
        entry.session.set(key, value);
        Ok(())
    }

    /// Reset the session to an empty attribute set.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the identifier is not live.
    pub fn clear(&self, identifier: &str) -> Result<(), SessionError> {
        let mut table = self.table();
        let entry = self.live(&mut table, identifier, Instant::now())?;
        entry.session.clear();
        debug!(sid_prefix = token::prefix(identifier), "session cleared");
        Ok(())
    }

    /// Move the session to a fresh identifier. The old one stops resolving at once.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the identifier is not live.
    pub fn rotate(&self, identifier: &str) -> Result<String, SessionError> {
        self.update_and_rotate(identifier, |_| ())
    }

    /// Apply `update` to the session and move it to a fresh identifier while
    /// holding the lock once, so nobody observes the updated state under the
    /// old identifier.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the identifier is not live, in which
    /// case `update` is not called.
    pub fn update_and_rotate<F>(&self, identifier: &str, update: F) -> Result<String, SessionError>
    where
        F: FnOnce(&mut Session),
    {
        let mut table = self.table();
        self.live(&mut table, identifier, Instant::now())?;

        // Generate first: a failure here must leave the old entry in place.
        let rotated = Self::fresh_identifier(&table)?;
        let mut entry = table.remove(identifier).ok_or(SessionError::NotFound)?;
        update(&mut entry.session);
        table.insert(rotated.clone(), entry);

        debug!(
            from = token::prefix(identifier),
            to = token::prefix(&rotated),
            "session rotated"
        );

        Ok(rotated)
    }

    /// Delete a session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the identifier is not live.
    pub fn remove(&self, identifier: &str) -> Result<Session, SessionError> {
        let mut table = self.table();
        self.live(&mut table, identifier, Instant::now())?;
        let entry = table.remove(identifier).ok_or(SessionError::NotFound)?;
        debug!(sid_prefix = token::prefix(identifier), "session removed");
        Ok(entry.session)
    }

    /// Evict every idle session, returning how many were dropped.
    pub fn purge_idle(&self) -> usize {
        let Some(timeout) = self.idle_timeout else {
            return 0;
        };
        let now = Instant::now();
        let mut table = self.table();
        let before = table.len();
        table.retain(|_, entry| now.saturating_duration_since(entry.last_seen) < timeout);
        before - table.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}
