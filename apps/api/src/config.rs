//! Application configuration loading from environment variables.
//!
//! All configuration is read once at startup. `dotenvy` fills the process
//! environment from `.env` before [`Config::from_env`] runs.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `JWT_SECRET`: Secret key for session token signing
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,nexen_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 5000)
//! - `DATABASE_MAX_CONNECTIONS`: DB pool size (default: 20)
//! - `REDIS_URL`: Redis used by the rate limiter (default: "redis://127.0.0.1:6379")
//! - `FRONTEND_URL`: Comma-separated CORS origins
//! - `TRUSTED_PROXIES`: Comma-separated proxy IPs whose forwarding headers are believed
//! - `ML_ENGINE_URL`: Base URL of the ML microservice (default: "http://localhost:5001")
//! - `SEED_MANAGER_PASSWORD_HASH`: Bcrypt hash for the seeded manager; no manager is seeded without it

use std::{net::IpAddr, str::FromStr};

/// Runtime configuration for the API server.
#[derive(Clone, Debug)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the database pool
    pub database_max_connections: u32,

    /// Redis connection URL backing the rate limiter
    pub redis_url: String,

    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Secret key for JWT signing and verification
    pub jwt_secret: String,

    /// Session lifetime in hours
    pub jwt_ttl_hours: i64,

    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,

    /// Origins allowed by CORS
    pub frontend_urls: Vec<String>,

    pub ml_engine_url: String,
    pub ml_engine_timeout_seconds: u64,

    /// Requests allowed per IP in one window; 0 disables limiting
    pub rate_limit_max_requests: u64,
    pub rate_limit_window_seconds: u64,

    /// Peers allowed to report the client IP through `X-Forwarded-For` / `X-Real-IP`
    pub trusted_proxies: Vec<IpAddr>,

    /// Maximum accepted request body in bytes
    pub body_limit_bytes: usize,

    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,

    pub enable_seed_route: bool,
    pub seed_manager_email: String,
    pub seed_manager_password_hash: Option<String>,

    /// Skip missing migrations during startup
    pub ignore_missing_migrations: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value cannot be
    /// parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            database_max_connections: env.or("DATABASE_MAX_CONNECTIONS", 20)?,
            redis_url: env.or("REDIS_URL", "redis://127.0.0.1:6379".to_string())?,
            host: env.or("HOST", "0.0.0.0".to_string())?,
            port: env.or("PORT", 5000)?,
            jwt_secret: env.required("JWT_SECRET")?,
            jwt_ttl_hours: env.or("JWT_TTL_HOURS", 24)?,
            cookie_secure: env.or("COOKIE_SECURE", false)?,
            frontend_urls: split_list(
                &env.or(
                    "FRONTEND_URL",
                    "http://localhost:3000,http://localhost:3001".to_string(),
                )?,
            ),
            ml_engine_url: env.or("ML_ENGINE_URL", "http://localhost:5001".to_string())?,
            ml_engine_timeout_seconds: env.or("ML_ENGINE_TIMEOUT_SECONDS", 30)?,
            rate_limit_max_requests: env.or("RATE_LIMIT_MAX_REQUESTS", 100)?,
            rate_limit_window_seconds: env.or("RATE_LIMIT_WINDOW_SECONDS", 900)?,
            trusted_proxies: parse_ips("TRUSTED_PROXIES", &env.optional("TRUSTED_PROXIES").unwrap_or_default())?,
            body_limit_bytes: env.or("BODY_LIMIT_BYTES", 10 * 1024 * 1024)?,
            bcrypt_cost: env.or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            enable_seed_route: env.or("ENABLE_SEED_ROUTE", true)?,
            seed_manager_email: env.or("SEED_MANAGER_EMAIL", "manager@nexen.local".to_string())?,
            seed_manager_password_hash: env.optional("SEED_MANAGER_PASSWORD_HASH"),
            ignore_missing_migrations: env.or("IGNORE_MISSING_MIGRATIONS", true)?,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Load a required variable.
    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.optional(key)
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
    }

    /// Unset and blank values are treated alike.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Load a variable with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but cannot be parsed.
    fn or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(val) => val
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
            None => Ok(default),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_ips(key: &str, raw: &str) -> anyhow::Result<Vec<IpAddr>> {
    split_list(raw)
        .iter()
        .map(|ip| {
            ip.parse::<IpAddr>()
                .map_err(|e| anyhow::anyhow!("Failed to parse {} entry {:?}: {}", key, ip, e))
        })
        .collect()
}
