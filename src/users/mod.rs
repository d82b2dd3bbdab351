//! User accounts: storage, wire models and HTTP handlers

pub mod api;
pub mod models;
pub mod store;

pub use models::{NewUser, User, UserPublic};
pub use store::UserStore;
