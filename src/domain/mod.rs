//! Domain layer containing entities, storage contracts and the time source.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Storage traits are implemented in [`crate::infrastructure`] and
//! orchestrated by [`crate::application::services`].
//!
//! - [`entities`] - link records and rate windows
//! - [`repositories`] - [`repositories::LinkStore`] and [`repositories::RateLimiter`]
//! - [`clock`] - injectable time source
//! - [`sweeper`] - background removal of expired state

pub mod clock;
pub mod entities;
pub mod repositories;
pub mod sweeper;
