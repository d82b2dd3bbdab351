//! Error Types
//! Mission: Map every failure to a fixed status code and detail message

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Column protected by a UNIQUE constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
        }
    }
}

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    Duplicate(UniqueField),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// HTTP-facing API errors
#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    IncorrectLogin,
    Forbidden,
    NotFound,
    UsernameExists,
    EmailExists,
    Conflict,
    Validation(String),
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::IncorrectLogin => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UsernameExists | ApiError::EmailExists => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::InvalidCredentials => "Could not validate credentials",
            ApiError::IncorrectLogin => "Incorrect username or password.",
            ApiError::Forbidden => "Not Enough Permissions.",
            ApiError::NotFound => "User Not Found.",
            ApiError::UsernameExists => "Username Already Exists.",
            ApiError::EmailExists => "Email Already Exists.",
            ApiError::Conflict => "Username or Email Already Exists.",
            ApiError::Validation(message) => message.as_str(),
            ApiError::Internal => "Internal Server Error.",
        }
    }

    /// Log an unexpected failure and hide it behind a generic 500
    pub fn internal(err: impl fmt::Display) -> Self {
        error!("Internal error: {}", err);
        ApiError::Internal
    }
}

impl From<StoreError> for ApiError {
    /// Duplicate errors are mapped by the caller since create and update
    /// report them differently.
    fn from(err: StoreError) -> Self {
        ApiError::internal(err)
    }
}

/// Extractor rejections keep axum's message but use the `detail` body.
macro_rules! rejection_into_validation {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Validation(rejection.body_text())
                }
            }
        )*
    };
}

rejection_into_validation!(JsonRejection, PathRejection, FormRejection, QueryRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "detail": self.detail() }));

        if let ApiError::InvalidCredentials = self {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_responses() {
        let (status, body) = body_json(ApiError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "detail": "Not Enough Permissions." }));

        let (status, body) = body_json(ApiError::UsernameExists).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Username Already Exists.");

        let (status, _) = body_json(ApiError::Conflict).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = body_json(ApiError::Validation("bad email".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "bad email");
    }

    #[test]
    fn test_invalid_credentials_challenges_bearer() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Duplicate(UniqueField::Email);
        assert_eq!(err.to_string(), "email already exists");
    }
}
