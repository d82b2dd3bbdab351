//! Authentication Guard
//! Mission: Resolve the bearer token on a request to a stored user

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::User;
use axum::http::{header, HeaderMap};
use tracing::debug;

/// Authenticate the caller of a protected handler.
///
/// Missing or malformed headers, bad or expired tokens, and tokens whose
/// subject no longer exists all fail with the same `InvalidCredentials`.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| {
        debug!("Rejected request: missing or malformed Authorization header");
        ApiError::InvalidCredentials
    })?;

    let username = state.jwt_handler.validate_token(token).map_err(|e| {
        debug!("Rejected request: {:#}", e);
        ApiError::InvalidCredentials
    })?;

    match state.user_store.get_by_username(&username).await? {
        Some(user) => Ok(user),
        None => {
            debug!("Rejected request: token subject {} has no account", username);
            Err(ApiError::InvalidCredentials)
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtHandler;
    use crate::config::TokenConfig;
    use crate::users::{NewUser, UserStore};
    use axum::http::HeaderValue;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn test_state() -> AppState {
        let store = UserStore::open_in_memory().unwrap();
        store
            .create(&NewUser {
                username: "alice".into(),
                email: "alice@gmail.com".into(),
                password_digest: "digest".into(),
            })
            .await
            .unwrap();

        let config =
            TokenConfig::new("guard-test-secret", Algorithm::HS256, Duration::minutes(30)).unwrap();
        AppState::new(store, JwtHandler::new(config), 4)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let state = test_state().await;
        let (token, _) = state.jwt_handler.issue_token("alice").unwrap();

        let user = authenticate(&state, &headers(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_uniform() {
        let state = test_state().await;
        let (ghost_token, _) = state.jwt_handler.issue_token("ghost").unwrap();

        let cases = [
            HeaderMap::new(),
            headers("Bearer token-invalido"),
            headers(&format!("Token {ghost_token}")),
            headers(&format!("Bearer {ghost_token}")),
        ];

        for case in cases {
            let err = authenticate(&state, &case).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidCredentials));
        }
    }
}
