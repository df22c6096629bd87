//! Utility functions for identifier generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short identifier generation and alias validation
//! - [`url_normalizer`] - URL normalization and self-reference guard
//! - [`client_key`] - Client IP extraction from connection info and proxy headers

pub mod client_key;
pub mod code_generator;
pub mod url_normalizer;
