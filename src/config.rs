//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Storage
//!
//! Without Redis settings the service keeps links and quotas in memory. To
//! share state between instances, point it at Redis either with a full URL:
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! ```
//!
//! or with individual components:
//!
//! ```bash
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_DOMAIN` - Own `host[:port]`, refused as a shortening target (default: `localhost:3000`)
//! - `RATE_LIMIT` - Create requests per client per window (default: 10)
//! - `RATE_LIMIT_WINDOW_SECONDS` - Quota window length (default: 3600)
//! - `LINK_TTL_HOURS` - Default link lifetime (default: 24)
//! - `MAX_EXPIRY_HOURS` - Longest lifetime a request may ask for, at most 87600 (default: 720)
//! - `SHORT_ID_LENGTH` - Generated identifier length, 6-8 (default: 7)
//! - `MAX_GENERATION_ATTEMPTS` - Collision retries before giving up (default: 5)
//! - `SWEEP_INTERVAL_SECONDS` - Expired state sweep period, 0 disables (default: 60)
//! - `BURST_REPLENISH_MS` / `BURST_SIZE` - Per-IP token bucket in front of all routes: one token
//!   restored every `BURST_REPLENISH_MS` milliseconds, up to `BURST_SIZE` (default: 200 / 50)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` (default: false)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// Upper bound for `MAX_EXPIRY_HOURS`: ten years.
const MAX_EXPIRY_HOURS_LIMIT: i64 = 87_600;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub public_domain: String,
    pub redis_url: Option<String>,
    pub log_level: String,
    pub log_format: String,
    /// When true, the client key is read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,

    // ── Admission ───────────────────────────────────────────────────────────
    pub rate_limit: u32,
    pub rate_limit_window_seconds: u64,
    /// Milliseconds for the burst guard to restore one token to an IP's bucket.
    pub burst_replenish_ms: u64,
    pub burst_size: u32,

    // ── Links ───────────────────────────────────────────────────────────────
    pub link_ttl_hours: i64,
    pub max_expiry_hours: i64,
    pub short_id_length: usize,
    pub max_generation_attempts: usize,
    /// Seconds between sweeps of expired in-memory state; 0 disables the sweeper.
    pub sweep_interval_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            public_domain: "localhost:3000".to_string(),
            redis_url: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            rate_limit: 10,
            rate_limit_window_seconds: 3600,
            burst_replenish_ms: 200,
            burst_size: 50,
            link_ttl_hours: 24,
            max_expiry_hours: 720,
            short_id_length: 7,
            max_generation_attempts: 5,
            sweep_interval_seconds: 60,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparsable numeric values fall back to their default; [`Config::validate`]
    /// catches values that parse but make no sense.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(defaults.behind_proxy);

        Ok(Self {
            listen_addr: env::var("LISTEN").unwrap_or(defaults.listen_addr),
            public_domain: env::var("PUBLIC_DOMAIN").unwrap_or(defaults.public_domain),
            redis_url: Self::load_redis_url(),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            behind_proxy,
            rate_limit: env_or("RATE_LIMIT", defaults.rate_limit),
            rate_limit_window_seconds: env_or(
                "RATE_LIMIT_WINDOW_SECONDS",
                defaults.rate_limit_window_seconds,
            ),
            burst_replenish_ms: env_or("BURST_REPLENISH_MS", defaults.burst_replenish_ms),
            burst_size: env_or("BURST_SIZE", defaults.burst_size),
            link_ttl_hours: env_or("LINK_TTL_HOURS", defaults.link_ttl_hours),
            max_expiry_hours: env_or("MAX_EXPIRY_HOURS", defaults.max_expiry_hours),
            short_id_length: env_or("SHORT_ID_LENGTH", defaults.short_id_length),
            max_generation_attempts: env_or(
                "MAX_GENERATION_ATTEMPTS",
                defaults.max_generation_attempts,
            ),
            sweep_interval_seconds: env_or(
                "SWEEP_INTERVAL_SECONDS",
                defaults.sweep_interval_seconds,
            ),
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.public_domain.trim().is_empty() {
            anyhow::bail!("PUBLIC_DOMAIN must not be empty");
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.rate_limit == 0 {
            anyhow::bail!("RATE_LIMIT must be at least 1");
        }

        if self.rate_limit_window_seconds == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECONDS must be greater than 0");
        }

        if self.burst_replenish_ms == 0 || self.burst_size == 0 {
            anyhow::bail!("BURST_REPLENISH_MS and BURST_SIZE must be greater than 0");
        }

        if self.link_ttl_hours < 1 {
            anyhow::bail!("LINK_TTL_HOURS must be at least 1");
        }

        if self.max_expiry_hours < self.link_ttl_hours {
            anyhow::bail!(
                "MAX_EXPIRY_HOURS ({}) must not be below LINK_TTL_HOURS ({})",
                self.max_expiry_hours,
                self.link_ttl_hours
            );
        }

        if self.max_expiry_hours > MAX_EXPIRY_HOURS_LIMIT {
            anyhow::bail!(
                "MAX_EXPIRY_HOURS must not exceed {}, got {}",
                MAX_EXPIRY_HOURS_LIMIT,
                self.max_expiry_hours
            );
        }

        if !(6..=8).contains(&self.short_id_length) {
            anyhow::bail!(
                "SHORT_ID_LENGTH must be between 6 and 8, got {}",
                self.short_id_length
            );
        }

        if self.max_generation_attempts == 0 || self.max_generation_attempts > 100 {
            anyhow::bail!(
                "MAX_GENERATION_ATTEMPTS must be between 1 and 100, got {}",
                self.max_generation_attempts
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Public domain: {}", self.public_domain);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Storage: Redis ({})", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Storage: in-memory");
        }

        tracing::info!(
            "  Rate limit: {} requests / {}s",
            self.rate_limit,
            self.rate_limit_window_seconds
        );
        tracing::info!("  Default link TTL: {}h", self.link_ttl_hours);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Masks sensitive information in connection strings for logging.
///
/// `redis://:password@host:port/db` becomes `redis://:***@host:port/db`.
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );
        assert_eq!(
            mask_connection_string("redis://localhost:6379/0"),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.rate_limit = 0;
        assert!(config.validate().is_err());
        config.rate_limit = 10;

        config.short_id_length = 12;
        assert!(config.validate().is_err());
        config.short_id_length = 6;

        config.max_expiry_hours = 12;
        assert!(config.validate().is_err());
        config.max_expiry_hours = i64::MAX;
        assert!(config.validate().is_err());
        config.max_expiry_hours = 87_600;
        assert!(config.validate().is_ok());
        config.max_expiry_hours = 48;

        config.burst_replenish_ms = 0;
        assert!(config.validate().is_err());
        config.burst_replenish_ms = 200;

        config.redis_url = Some("mysql://localhost/test".to_string());
        assert!(config.validate().is_err());
        config.redis_url = Some("redis://localhost:6379/0".to_string());

        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("RATE_LIMIT", "3");
            env::set_var("LINK_TTL_HOURS", "48");
            env::set_var("SHORT_ID_LENGTH", "not-a-number");
            env::set_var("BEHIND_PROXY", "TRUE");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.rate_limit, 3);
        assert_eq!(config.link_ttl_hours, 48);
        assert_eq!(config.short_id_length, 7);
        assert!(config.behind_proxy);

        unsafe {
            env::remove_var("RATE_LIMIT");
            env::remove_var("LINK_TTL_HOURS");
            env::remove_var("SHORT_ID_LENGTH");
            env::remove_var("BEHIND_PROXY");
        }
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("REDIS_URL");
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://:secret@redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::remove_var("REDIS_HOST");
            env::remove_var("REDIS_PORT");
            env::remove_var("REDIS_DB");
            env::remove_var("REDIS_PASSWORD");
        }
    }

    #[test]
    #[serial]
    fn test_redis_url_priority() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("REDIS_URL", "redis://from-url:6379/0");
            env::set_var("REDIS_HOST", "from-components");
        }

        let url = Config::load_redis_url().unwrap();
        assert!(url.contains("from-url"));
        assert!(!url.contains("from-components"));

        unsafe {
            env::remove_var("REDIS_URL");
            env::remove_var("REDIS_HOST");
        }
    }
}
