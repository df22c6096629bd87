//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its original URL.
///
/// # Endpoint
///
/// `GET /{short}`
///
/// Answers with 307 Temporary Redirect. A permanent redirect would let
/// browsers keep following the link after it expires.
///
/// # Errors
///
/// Returns 404 Not Found for unknown and expired identifiers alike.
pub async fn redirect_handler(
    Path(short): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.shorten_service.handle_resolve(&short).await?;

    Ok(Redirect::temporary(&record.original_url))
}
