//! Background removal of expired links and idle rate windows.
//!
//! Lazy expiry on read already hides dead records; the sweeper only bounds
//! memory for in-process backends. Each pass removes records through the
//! store's own locking, so a concurrent resolve sees a record either whole or
//! not at all.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::domain::repositories::{LinkStore, RateLimiter};

/// Counts from one sweep pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub links_removed: usize,
    pub windows_removed: usize,
}

/// Runs a single sweep over both tables.
///
/// Backend errors are logged and counted as zero removals.
pub async fn sweep_once(links: &dyn LinkStore, limiter: &dyn RateLimiter) -> SweepReport {
    let links_removed = links.purge_expired().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to purge expired links");
        0
    });

    let windows_removed = limiter.purge_idle().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to purge idle rate windows");
        0
    });

    SweepReport {
        links_removed,
        windows_removed,
    }
}

/// Sweeps every `period` until the task is aborted.
pub async fn run_expiry_sweeper(
    links: Arc<dyn LinkStore>,
    limiter: Arc<dyn RateLimiter>,
    period: Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick fires immediately; nothing can have expired yet.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let report = sweep_once(links.as_ref(), limiter.as_ref()).await;
        if report.links_removed > 0 || report.windows_removed > 0 {
            debug!(
                links_removed = report.links_removed,
                windows_removed = report.windows_removed,
                "Sweep finished"
            );
        }
    }
}
