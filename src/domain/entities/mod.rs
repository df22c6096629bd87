//! Core domain entities.
//!
//! - [`LinkRecord`] - a short identifier mapped to an original URL with its expiry
//! - [`Resolution`] - outcome of looking a short identifier up
//! - [`RateWindow`] - fixed-window quota state of one client
//! - [`Admission`] - the limiter's decision for a single request

pub mod link;
pub mod rate_window;

pub use link::{LinkRecord, Resolution};
pub use rate_window::{Admission, RateWindow};
