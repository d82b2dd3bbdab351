//! Authentication Module
//! Mission: Bearer-token access with self-only account changes

pub mod api;
pub mod guard;
pub mod jwt;
pub mod models;
pub mod password;

pub use guard::authenticate;
pub use jwt::JwtHandler;
