//! Authentication Models
//! Mission: Define token claims and login payloads

use serde::{Deserialize, Serialize};

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username). Optional so a token without it can be rejected
    /// explicitly instead of failing deserialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: usize, // expiration timestamp
}

/// Login form body (OAuth2 password flow)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: usize, // seconds until expiration
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: usize) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}
