//! Background eviction of idle sessions.

use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, info};

use super::store::SessionStore;

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Spawn a task that purges idle sessions every `every`.
///
/// Returns `None` when the store never expires sessions, or when `every` is zero.
pub fn spawn_sweeper(store: Arc<SessionStore>, every: Duration) -> Option<JoinHandle<()>> {
    store.idle_timeout()?;
    if every.is_zero() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = interval(every);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let evicted = store.purge_idle();
            if evicted > 0 {
                info!(evicted, "Idle sessions evicted");
            }
            debug!(active_sessions = store.len(), "Session store status");
        }
    }))
}
