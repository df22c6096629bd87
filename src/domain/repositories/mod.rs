//! Storage trait definitions for the domain layer.
//!
//! These traits abstract the two keyed tables the service mutates concurrently.
//! Concrete implementations live in `crate::infrastructure`; mock
//! implementations are auto-generated via `mockall` for testing.
//!
//! # Available Traits
//!
//! - [`LinkStore`] - short identifier to URL records
//! - [`RateLimiter`] - per-client fixed-window quotas

pub mod link_store;
pub mod rate_limiter;

pub use link_store::LinkStore;
pub use rate_limiter::RateLimiter;

#[cfg(test)]
pub use link_store::MockLinkStore;
#[cfg(test)]
pub use rate_limiter::MockRateLimiter;
