//! Link creation and resolution service.

use std::sync::Arc;

use chrono::{Duration, TimeDelta};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::entities::{Admission, LinkRecord, Resolution};
use crate::domain::repositories::{LinkStore, RateLimiter};
use crate::error::AppError;
use crate::utils::code_generator::{IdGenerator, validate_alias};
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_target};

/// Tunables for link creation.
#[derive(Debug, Clone)]
pub struct ShortenPolicy {
    /// TTL applied when the request carries no expiry.
    pub default_ttl_hours: i64,
    /// Largest expiry a request may ask for.
    pub max_expiry_hours: i64,
    /// Generated candidates tried before giving up.
    pub max_generation_attempts: usize,
    /// The service's own `host[:port]`; URLs pointing at it are refused.
    pub public_domain: Option<String>,
}

impl Default for ShortenPolicy {
    fn default() -> Self {
        Self {
            default_ttl_hours: 24,
            max_expiry_hours: 720,
            max_generation_attempts: 5,
            public_domain: None,
        }
    }
}

impl From<&Config> for ShortenPolicy {
    fn from(config: &Config) -> Self {
        Self {
            default_ttl_hours: config.link_ttl_hours,
            max_expiry_hours: config.max_expiry_hours,
            max_generation_attempts: config.max_generation_attempts,
            public_domain: Some(config.public_domain.clone()),
        }
    }
}

/// A successfully created link with the quota state of the requesting client.
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub record: LinkRecord,
    pub expiry_hours: i64,
    pub admission: Admission,
}

/// Service handling shorten and resolve requests.
///
/// Create requests pass through admission, URL validation, then either the
/// alias path or the generate path, and are persisted through the
/// [`LinkStore`]'s atomic insert. The alias path checks
/// [`LinkStore::exists`] first to fail fast, but uniqueness never relies on it.
pub struct ShortenService {
    links: Arc<dyn LinkStore>,
    limiter: Arc<dyn RateLimiter>,
    generator: Arc<dyn IdGenerator>,
    policy: ShortenPolicy,
}

impl ShortenService {
    pub fn new(
        links: Arc<dyn LinkStore>,
        limiter: Arc<dyn RateLimiter>,
        generator: Arc<dyn IdGenerator>,
        policy: ShortenPolicy,
    ) -> Self {
        Self {
            links,
            limiter,
            generator,
            policy,
        }
    }

    /// Creates a short link for `long_url` on behalf of `client_key`.
    ///
    /// # Arguments
    ///
    /// - `long_url` - URL to shorten; a missing scheme defaults to `http://`
    /// - `alias` - optional custom identifier; empty strings count as absent
    /// - `expiry_hours` - optional TTL override, defaults to the policy TTL
    /// - `client_key` - identity charged against the rate limit
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimitExceeded`] when the client's quota is spent
    /// - [`AppError::InvalidUrl`], [`AppError::InvalidAlias`], [`AppError::InvalidExpiry`]
    ///   for bad input
    /// - [`AppError::AliasTaken`] when a live link already uses the alias
    /// - [`AppError::GenerationExhausted`] when every generated candidate collided
    pub async fn handle_create(
        &self,
        long_url: &str,
        alias: Option<&str>,
        expiry_hours: Option<i64>,
        client_key: &str,
    ) -> Result<ShortenOutcome, AppError> {
        let result = self
            .create(long_url, alias, expiry_hours, client_key)
            .await;

        let outcome = match &result {
            Ok(_) => "created",
            Err(e) => e.kind(),
        };
        metrics::counter!("shorten_requests_total", "outcome" => outcome).increment(1);

        result
    }

    async fn create(
        &self,
        long_url: &str,
        alias: Option<&str>,
        expiry_hours: Option<i64>,
        client_key: &str,
    ) -> Result<ShortenOutcome, AppError> {
        let admission = self.limiter.admit(client_key).await?;
        if !admission.allowed {
            info!(
                client = client_key,
                reset_in = admission.reset_in_seconds,
                "Rate limit exceeded"
            );
            return Err(AppError::RateLimitExceeded {
                reset_in_seconds: admission.reset_in_seconds,
            });
        }

        let url = normalize_target(long_url, self.policy.public_domain.as_deref())
            .map_err(invalid_url)?;

        let (expiry_hours, ttl) = self.resolve_expiry(expiry_hours)?;

        let record = match alias.filter(|a| !a.is_empty()) {
            Some(alias) => self.create_with_alias(alias, &url, ttl).await?,
            None => self.create_with_generated_id(&url, ttl).await?,
        };

        info!(
            short_id = %record.short_id,
            url = %record.original_url,
            expiry_hours,
            remaining = admission.remaining,
            "Short link created"
        );

        Ok(ShortenOutcome {
            record,
            expiry_hours,
            admission,
        })
    }

    /// Retrieves the live record for `short_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown and expired identifiers alike.
    pub async fn handle_resolve(&self, short_id: &str) -> Result<LinkRecord, AppError> {
        let result = match self.links.resolve(short_id).await? {
            Resolution::Found(record) => Ok(record),
            Resolution::Expired => {
                info!(short_id, "Resolve hit an expired link");
                Err(AppError::NotFound {
                    short_id: short_id.to_string(),
                })
            }
            Resolution::NotFound => Err(AppError::NotFound {
                short_id: short_id.to_string(),
            }),
        };

        let outcome = match &result {
            Ok(_) => "found",
            Err(_) => "not_found",
        };
        metrics::counter!("resolve_requests_total", "outcome" => outcome).increment(1);

        result
    }

    /// Returns true if the link storage backend answers.
    pub async fn storage_healthy(&self) -> bool {
        self.links.health_check().await
    }

    /// Picks the expiry in hours and the matching TTL.
    fn resolve_expiry(&self, requested: Option<i64>) -> Result<(i64, Duration), AppError> {
        let invalid = || AppError::InvalidExpiry {
            max_hours: self.policy.max_expiry_hours,
        };

        let hours = match requested {
            None => self.policy.default_ttl_hours,
            Some(hours) if (1..=self.policy.max_expiry_hours).contains(&hours) => hours,
            Some(_) => return Err(invalid()),
        };

        let ttl = TimeDelta::try_hours(hours).ok_or_else(invalid)?;
        Ok((hours, ttl))
    }

    async fn create_with_alias(
        &self,
        alias: &str,
        url: &str,
        ttl: Duration,
    ) -> Result<LinkRecord, AppError> {
        validate_alias(alias)?;

        let taken = || {
            warn!(alias, "Custom alias already in use");
            AppError::AliasTaken {
                alias: alias.to_string(),
            }
        };

        if self.links.exists(alias).await? {
            return Err(taken());
        }

        self.links
            .try_create(alias, url, ttl)
            .await?
            .ok_or_else(taken)
    }

    async fn create_with_generated_id(
        &self,
        url: &str,
        ttl: Duration,
    ) -> Result<LinkRecord, AppError> {
        let attempts = self.policy.max_generation_attempts;

        for attempt in 1..=attempts {
            let candidate = self.generator.generate();

            if let Some(record) = self.links.try_create(&candidate, url, ttl).await? {
                return Ok(record);
            }

            warn!(candidate = %candidate, attempt, "Generated identifier collided");
        }

        error!(
            attempts,
            "Identifier generation exhausted; the identifier space needs widening"
        );
        Err(AppError::GenerationExhausted { attempts })
    }
}

fn invalid_url(e: UrlNormalizationError) -> AppError {
    let message = match e {
        UrlNormalizationError::UnsupportedProtocol => {
            "Only http and https URLs can be shortened.".to_string()
        }
        UrlNormalizationError::SelfReference => {
            "Links to this service cannot be shortened.".to_string()
        }
        UrlNormalizationError::InvalidFormat(_) | UrlNormalizationError::NormalizationFailed(_) => {
            "Invalid URL. Please provide a valid web address.".to_string()
        }
    };
    AppError::InvalidUrl(message)
}
