//! # Snaplink
//!
//! A URL shortening service with expiring links and per-client creation
//! quotas, built with Axum.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link records, rate windows, storage traits and the clock
//! - **Application Layer** ([`application`]) - Create and resolve orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory and Redis backends
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random 6-8 character identifiers or custom aliases
//! - Links expire after a configurable TTL
//! - Fixed-window quota per client, reported on every response
//! - Optional Redis storage shared between instances
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional
//! cargo run
//!
//! curl -X POST localhost:3000/api/v1 -H 'content-type: application/json' \
//!      -d '{"url":"https://www.rust-lang.org/learn"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ShortenPolicy, ShortenService};
    pub use crate::domain::clock::{Clock, ManualClock, SystemClock};
    pub use crate::domain::entities::{Admission, LinkRecord, Resolution};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
