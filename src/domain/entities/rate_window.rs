//! Fixed-window quota state for a single client.

use chrono::{DateTime, Duration, Utc};

/// Quota window for one client key.
///
/// `remaining` starts at the configured limit and is decremented per admitted
/// request. Once `window_start + window` has been reached the window is reset
/// before the next request is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    pub remaining: u32,
    pub window_start: DateTime<Utc>,
}

/// Result of asking the limiter to admit a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_in_seconds: u64,
    /// True when this call opened a new window or reset an elapsed one.
    pub fresh_window: bool,
}

impl Admission {
    pub fn allowed(remaining: u32, reset_in_seconds: u64, fresh_window: bool) -> Self {
        Self {
            allowed: true,
            remaining,
            reset_in_seconds,
            fresh_window,
        }
    }

    pub fn denied(reset_in_seconds: u64) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_in_seconds,
            fresh_window: false,
        }
    }

    /// Seconds until the quota renews as reported to clients.
    ///
    /// A request that opened its window has no reset pending and reports 0.
    pub fn reported_reset(&self) -> u64 {
        if self.fresh_window {
            0
        } else {
            self.reset_in_seconds
        }
    }
}

impl RateWindow {
    /// Opens a full window starting at `now`.
    pub fn open(limit: u32, now: DateTime<Utc>) -> Self {
        Self {
            remaining: limit,
            window_start: now,
        }
    }

    pub fn resets_at(&self, window: Duration) -> DateTime<Utc> {
        self.window_start + window
    }

    /// True once the window has run its course at `now`.
    pub fn has_elapsed(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now >= self.resets_at(window)
    }

    /// Resets the window if it has elapsed, then spends one unit of quota if any is left.
    pub fn admit(&mut self, limit: u32, window: Duration, now: DateTime<Utc>) -> Admission {
        let mut fresh = false;
        if self.has_elapsed(window, now) {
            *self = Self::open(limit, now);
            fresh = true;
        }

        let reset_in = seconds_until(self.resets_at(window), now);

        if self.remaining == 0 {
            return Admission::denied(reset_in);
        }

        self.remaining -= 1;
        Admission::allowed(self.remaining, reset_in, fresh)
    }
}

/// Whole seconds from `now` until `target`, rounded up and never negative.
pub fn seconds_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (target - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis as u64).div_ceil(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_admit_decrements_until_exhausted() {
        let window = Duration::hours(1);
        let mut state = RateWindow::open(3, t0());

        assert_eq!(state.admit(3, window, t0()).remaining, 2);
        assert_eq!(state.admit(3, window, t0()).remaining, 1);
        assert_eq!(state.admit(3, window, t0()).remaining, 0);

        let denied = state.admit(3, window, t0() + Duration::minutes(30));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_in_seconds, 1800);
        assert_eq!(state.remaining, 0);
    }

    #[test]
    fn test_admit_resets_elapsed_window() {
        let window = Duration::hours(1);
        let mut state = RateWindow {
            remaining: 0,
            window_start: t0(),
        };

        let admission = state.admit(10, window, t0() + window);
        assert!(admission.allowed);
        assert!(admission.fresh_window);
        assert_eq!(admission.remaining, 9);
        assert_eq!(admission.reset_in_seconds, 3600);
        assert_eq!(state.window_start, t0() + window);
    }

    #[test]
    fn test_reported_reset_is_zero_for_fresh_window() {
        let fresh = Admission::allowed(9, 3600, true);
        assert_eq!(fresh.reported_reset(), 0);

        let ongoing = Admission::allowed(8, 3500, false);
        assert_eq!(ongoing.reported_reset(), 3500);
    }

    #[test]
    fn test_seconds_until_rounds_up() {
        assert_eq!(seconds_until(t0() + Duration::milliseconds(1), t0()), 1);
        assert_eq!(seconds_until(t0() + Duration::seconds(5), t0()), 5);
        assert_eq!(seconds_until(t0(), t0() + Duration::seconds(5)), 0);
    }
}
