//! Periodic removal of expired sessions.
//!
//! Lookups already drop an expired session when its token is presented.
//! Sessions nobody presents again are only removed here.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use shopkit_core::result::AppResult;
use shopkit_database::store::SessionStore;

/// Deletes expired sessions on a fixed interval.
#[derive(Clone)]
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    every: Duration,
}

impl std::fmt::Debug for SessionSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSweeper")
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

impl SessionSweeper {
    /// A zero interval is raised to one second.
    pub fn new(store: Arc<dyn SessionStore>, every: Duration) -> Self {
        Self {
            store,
            every: every.max(Duration::from_secs(1)),
        }
    }

    /// One pass. Returns how many sessions were deleted.
    pub async fn sweep(&self) -> AppResult<u64> {
        let purged = self.store.purge_expired().await?;
        if purged > 0 {
            info!(purged, "Expired sessions removed");
        } else {
            debug!("No expired sessions to remove");
        }
        Ok(purged)
    }

    /// Run [`Self::sweep`] forever on the interval. A failed pass is logged
    /// and retried on the next tick.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep().await {
                    warn!(error = %e, "Session sweep failed");
                }
            }
        })
    }
}
