//! JWT Token Handler
//! Mission: Issue and validate signed, time-limited access tokens

use crate::auth::models::Claims;
use crate::config::TokenConfig;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT Handler for token operations
pub struct JwtHandler {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtHandler {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> usize {
        self.config.ttl.num_seconds().max(0) as usize
    }

    /// Issue a token for `subject`, valid from now
    pub fn issue_token(&self, subject: &str) -> Result<(String, usize)> {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if the clock read `now`
    pub fn issue_token_at(&self, subject: &str, now: DateTime<Utc>) -> Result<(String, usize)> {
        let expiration = now
            .checked_add_signed(self.config.ttl)
            .context("Invalid timestamp")?
            .timestamp()
            .max(0) as usize;

        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: expiration,
        };

        debug!(
            "Generating JWT for {}, expires in {}s",
            subject,
            self.expires_in()
        );

        let token = encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.encoding_key,
        )
        .context("Failed to generate JWT")?;

        Ok((token, self.expires_in()))
    }

    /// Validate a token and return its subject
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = 0;

        let decoded = decode::<Claims>(token, &self.decoding_key, &validation)
            .context("Invalid or expired token")?;

        let subject = decoded
            .claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| anyhow!("Token has no subject"))?;

        debug!("Validated JWT for {}", subject);

        Ok(subject)
    }
}
