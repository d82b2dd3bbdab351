//! Router assembly

use crate::auth::api as auth_api;
use crate::middleware::request_logging;
use crate::state::AppState;
use crate::users::{api as users_api, models::Message};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/token", post(auth_api::login))
        .route(
            "/users",
            get(users_api::list_users).post(users_api::create_user),
        )
        .route(
            "/users/",
            get(users_api::list_users).post(users_api::create_user),
        )
        .route(
            "/users/:id",
            get(users_api::get_user)
                .put(users_api::update_user)
                .delete(users_api::delete_user),
        )
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root - GET /
async fn root() -> Json<Message> {
    Json(Message::new("Hello, World!"))
}
