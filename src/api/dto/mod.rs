//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization. Input checks
//! live in the service layer so every entry point shares them.

pub mod health;
pub mod shorten;
