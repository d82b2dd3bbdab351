//! User API Endpoints
//! Mission: Registration, listing, retrieval, update and deletion of accounts

use crate::auth::{authenticate, password::hash_password};
use crate::error::{ApiError, StoreError, UniqueField};
use crate::state::AppState;
use crate::users::models::{
    ListParams, Message, NewUser, User, UserList, UserPublic, UserSchema,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::warn;

/// Create user - POST /users/
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserSchema>, JsonRejection>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    // Report duplicates before paying for a digest
    if let Some(field) = state
        .user_store
        .find_conflict(&payload.username, &payload.email)
        .await?
    {
        return Err(duplicate_on_create(field));
    }

    let new_user = digest_schema(&state, payload)?;

    let user = state
        .user_store
        .create(&new_user)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(field) => duplicate_on_create(field),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(UserPublic::from(&user))))
}

/// List users - GET /users/
pub async fn list_users(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<UserList>, ApiError> {
    let Query(params) = params?;
    let users = state
        .user_store
        .list(params.offset, params.limit)
        .await?
        .iter()
        .map(UserPublic::from)
        .collect();

    Ok(Json(UserList { users }))
}

/// Get user - GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserPublic>, ApiError> {
    let Path(user_id) = user_id?;

    state
        .user_store
        .get(user_id)
        .await?
        .map(|user| Json(UserPublic::from(&user)))
        .ok_or(ApiError::NotFound)
}

/// Update user - PUT /users/:id (own account only)
pub async fn update_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<UserSchema>, JsonRejection>,
) -> Result<Json<UserPublic>, ApiError> {
    // Authentication comes before anything about the request itself
    let caller = authenticate(&state, &headers).await?;
    let Path(user_id) = user_id?;
    ensure_owner(&caller, user_id)?;

    let Json(payload) = payload?;
    payload.validate()?;
    let changes = digest_schema(&state, payload)?;

    let updated = state
        .user_store
        .update(user_id, &changes)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::Conflict,
            other => other.into(),
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(UserPublic::from(&updated)))
}

/// Delete user - DELETE /users/:id (own account only)
pub async fn delete_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
) -> Result<Json<Message>, ApiError> {
    let caller = authenticate(&state, &headers).await?;
    let Path(user_id) = user_id?;
    ensure_owner(&caller, user_id)?;

    if !state.user_store.delete(user_id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(Message::new("User Deleted.")))
}

/// Ownership is decided by the path id alone, before the target is looked up.
fn ensure_owner(caller: &User, target_id: i64) -> Result<(), ApiError> {
    if caller.id != target_id {
        warn!(
            "User {} ({}) tried to modify user {}",
            caller.username, caller.id, target_id
        );
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

fn duplicate_on_create(field: UniqueField) -> ApiError {
    match field {
        UniqueField::Username => ApiError::UsernameExists,
        UniqueField::Email => ApiError::EmailExists,
    }
}

fn digest_schema(state: &AppState, payload: UserSchema) -> Result<NewUser, ApiError> {
    let password_digest =
        hash_password(&payload.password, state.bcrypt_cost).map_err(ApiError::internal)?;

    Ok(NewUser {
        username: payload.username,
        email: payload.email,
        password_digest,
    })
}
