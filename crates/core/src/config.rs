//! Process configuration.
//!
//! Built once at startup and passed by reference into the components that
//! need it. Nothing here is mutable after construction.

use chrono::Duration;

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret. Rotating it invalidates all outstanding tokens.
    pub secret: String,
    /// Token lifetime; expiry is the only deactivation path.
    pub ttl: Duration,
}

/// Listing/pagination bounds.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Build a config with the given secret and default bounds (24h tokens,
    /// page sizes 10/100).
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt: JwtConfig {
                secret: secret.into(),
                ttl: Duration::hours(24),
            },
            pagination: PaginationConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `MEDIREC_JWT_SECRET` is required. `MEDIREC_JWT_TTL_HOURS`,
    /// `MEDIREC_DEFAULT_PAGE_SIZE` and `MEDIREC_MAX_PAGE_SIZE` override the
    /// defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("MEDIREC_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("MEDIREC_JWT_SECRET is not set"))?;
        if secret.is_empty() {
            anyhow::bail!("MEDIREC_JWT_SECRET is empty");
        }

        let mut config = Self::new(secret);

        if let Ok(hours) = std::env::var("MEDIREC_JWT_TTL_HOURS") {
            let hours: i64 = hours.parse()?;
            config.jwt.ttl = Duration::hours(hours);
        }
        if let Ok(size) = std::env::var("MEDIREC_DEFAULT_PAGE_SIZE") {
            config.pagination.default_page_size = size.parse()?;
        }
        if let Ok(size) = std::env::var("MEDIREC_MAX_PAGE_SIZE") {
            config.pagination.max_page_size = size.parse()?;
        }

        Ok(config)
    }
}
