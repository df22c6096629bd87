//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the storage
//! traits, validation and admission control. Services provide a clean API for
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Short link creation and resolution

pub mod services;
