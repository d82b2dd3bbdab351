//! userbase
//!
//! User registration API guarded by bearer-token authentication.
//! Exposes the router and its parts for the binary and tests.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;
pub mod users;

pub use app::build_router;
pub use state::AppState;
