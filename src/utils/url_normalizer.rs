//! URL validation and normalization.
//!
//! Bare hosts such as `example.com/page` are accepted and stored as
//! `http://example.com/page`. Only HTTP and HTTPS targets are allowed, and a
//! URL pointing back at the service's own domain is refused to avoid
//! redirect loops.

use url::{ParseError, Url};

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs can be shortened")]
    UnsupportedProtocol,

    #[error("URLs pointing to this service cannot be shortened")]
    SelfReference,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Scheme**: added as `http://` when missing, including bare `host:port`
///    input; only HTTP and HTTPS allowed
/// 2. **Hostname**: converted to lowercase
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 4. **Path, query and fragment**: preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn normalize_url(input: &str) -> Result<Url, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL is empty".to_string(),
        ));
    }

    let parsed = if lacks_scheme(trimmed) {
        Err(ParseError::RelativeUrlWithoutBase)
    } else {
        Url::parse(trimmed)
    };

    let mut url = match parsed {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{trimmed}"))
            .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?,
        Err(e) => return Err(UrlNormalizationError::InvalidFormat(e.to_string())),
    };

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let Some(host) = url.host_str() else {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL has no host".to_string(),
        ));
    };

    let host_lowercase = host.to_ascii_lowercase();
    url.set_host(Some(&host_lowercase)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url)
}

/// `example.com:8080/page` parses as scheme `example.com`, so a colon
/// followed by a port number means the scheme is missing.
fn lacks_scheme(input: &str) -> bool {
    if input.contains("://") {
        return false;
    }
    input
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Normalizes `input` and refuses it if it targets `public_domain`.
///
/// `public_domain` is compared as `host[:port]`, ignoring a leading `www.`
/// on either side.
pub fn normalize_target(
    input: &str,
    public_domain: Option<&str>,
) -> Result<String, UrlNormalizationError> {
    let url = normalize_url(input)?;

    if let Some(own) = public_domain
        && same_authority(&url, own)
    {
        return Err(UrlNormalizationError::SelfReference);
    }

    Ok(url.to_string())
}

fn same_authority(url: &Url, public_domain: &str) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };

    let target = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    strip_www(&target) == strip_www(&canonical_domain(public_domain))
}

/// Lowercases a configured domain and strips any scheme and path.
fn canonical_domain(domain: &str) -> String {
    let lowered = domain.trim().to_ascii_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

fn strip_www(authority: &str) -> &str {
    authority.strip_prefix("www.").unwrap_or(authority)
}
