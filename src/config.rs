//! Configuration
//! Mission: Parse settings once at start-up and hand them out explicitly

use anyhow::{bail, Context, Result};
use chrono::Duration;
use clap::Parser;
use jsonwebtoken::Algorithm;
use std::str::FromStr;

pub const DEV_SECRET_KEY: &str = "dev-secret-change-in-production-minimum-32-characters";

#[derive(Parser, Debug, Clone)]
#[command(name = "userbase")]
#[command(about = "User registration API with bearer-token authentication")]
pub struct Settings {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "userbase.db")]
    pub database_path: String,

    /// Secret used to sign access tokens
    #[arg(long, env = "SECRET_KEY", default_value = DEV_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Token signing algorithm (HS256, HS384 or HS512)
    #[arg(long, env = "ALGORITHM", default_value = "HS256")]
    pub algorithm: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES", default_value = "30")]
    pub access_token_expire_minutes: i64,

    /// bcrypt work factor for password digests
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,
}

/// Signing configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, algorithm: Algorithm, ttl: Duration) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            bail!("Token secret must not be empty");
        }
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            bail!("Unsupported token algorithm {:?}; expected HS256, HS384 or HS512", algorithm);
        }
        if ttl <= Duration::zero() {
            bail!("Token lifetime must be positive");
        }
        Ok(Self {
            secret,
            algorithm,
            ttl,
        })
    }
}

impl Settings {
    pub fn token_config(&self) -> Result<TokenConfig> {
        let algorithm = Algorithm::from_str(&self.algorithm.to_ascii_uppercase())
            .with_context(|| format!("Unknown token algorithm: {}", self.algorithm))?;

        let ttl = Duration::try_minutes(self.access_token_expire_minutes)
            .context("Access token lifetime out of range")?;

        TokenConfig::new(self.secret_key.clone(), algorithm, ttl)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}
