//! Authentication API Endpoints
//! Mission: Exchange username and password for an access token

use crate::auth::{
    models::{LoginForm, TokenResponse},
    password::verify_password,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use tracing::{info, warn};

/// Login endpoint - POST /token
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Form(form) = form?;
    info!("🔐 Login attempt: {}", form.username);

    let user = state
        .user_store
        .get_by_username(&form.username)
        .await?
        .filter(|user| verify_password(&form.password, &user.password_digest));

    let Some(user) = user else {
        warn!("❌ Failed login attempt: {}", form.username);
        return Err(ApiError::IncorrectLogin);
    };

    let (token, expires_in) = state
        .jwt_handler
        .issue_token(&user.username)
        .map_err(ApiError::internal)?;

    info!("✅ Login successful: {}", user.username);

    Ok(Json(TokenResponse::bearer(token, expires_in)))
}
