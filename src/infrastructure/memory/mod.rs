//! In-process storage backends.
//!
//! Used when no Redis URL is configured. State lives for the lifetime of the
//! process and is trimmed by [`crate::domain::sweeper`].

mod link_store;
mod rate_limiter;

pub use link_store::InMemoryLinkStore;
pub use rate_limiter::InMemoryRateLimiter;
