//! Infrastructure layer implementing the domain storage traits.
//!
//! # Modules
//!
//! - [`memory`] - in-process `DashMap` backends (default)
//! - [`redis_store`] - Redis backends, selected when `REDIS_URL` is configured

pub mod memory;
pub mod redis_store;
