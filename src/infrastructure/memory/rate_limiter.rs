//! In-process fixed-window rate limiter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::clock::Clock;
use crate::domain::entities::{Admission, RateWindow};
use crate::domain::repositories::RateLimiter;
use crate::error::AppError;

/// [`RateLimiter`] keeping one [`RateWindow`] per client in a [`DashMap`].
///
/// The window is mutated while its shard is write-locked, so reset, check and
/// decrement form one step per client key.
pub struct InMemoryRateLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<String, RateWindow>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRateLimiter {
    pub fn new(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
            clock,
        }
    }

    /// Number of tracked client windows.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn admit(&self, client_key: &str) -> Result<Admission, AppError> {
        let now = self.clock.now();

        let admission = match self.windows.entry(client_key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().admit(self.limit, self.window, now)
            }
            Entry::Vacant(vacant) => {
                let mut window = RateWindow::open(self.limit, now);
                let admission = window.admit(self.limit, self.window, now);
                vacant.insert(window);
                Admission {
                    fresh_window: true,
                    ..admission
                }
            }
        };

        Ok(admission)
    }

    async fn purge_idle(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows
            .retain(|_, window| !window.has_elapsed(self.window, now));
        Ok(before.saturating_sub(self.windows.len()))
    }
}
