//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ShortenService;

/// State cloned into every request handler.
///
/// The service is behind an [`Arc`], so cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    /// Whether client identity is read from proxy headers.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(shorten_service: Arc<ShortenService>, behind_proxy: bool) -> Self {
        Self {
            shorten_service,
            behind_proxy,
        }
    }
}
