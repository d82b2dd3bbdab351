//! User Models
//! Mission: Stored user records and their public wire forms

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Stored user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_digest: String, // bcrypt hash - never serialize
    pub created_at: String,
}

/// Fields written on create and update
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

/// Create/update request body
#[derive(Debug, Deserialize)]
pub struct UserSchema {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserSchema {
    /// Reject blank usernames and anything that is not `local@domain`.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::Validation("Username must not be empty.".into()));
        }
        if !is_plausible_email(&self.email) {
            return Err(ApiError::Validation("Invalid email address.".into()));
        }
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password must not be empty.".into()));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// User response (sanitized)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<UserPublic>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Pagination for GET /users/
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default, alias = "skip")]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}
