//! HTTP middleware for request processing and protection.
//!
//! Provides burst limiting and observability middleware.

pub mod burst_limit;
pub mod tracing;
