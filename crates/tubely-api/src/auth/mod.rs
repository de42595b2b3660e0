//! Bearer-token authentication
//!
//! Access tokens are HS256 JWTs whose subject is the user's UUID. Handlers take an
//! [`AuthUser`] argument; extraction fails with 401 when the token is missing or invalid.

pub mod jwt;
pub mod models;

pub use jwt::JwtService;
pub use models::{AuthUser, JwtClaims};
