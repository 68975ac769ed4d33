//! Authentication: the login exchange and the on-disk token cache.
//!
//! - `Authenticator`: trades a username and password for a bearer token
//! - `TokenStore`: persists the last known token between runs

pub mod authenticator;
pub mod token_store;

pub use authenticator::Authenticator;
pub use token_store::{TokenRecord, TokenStore};

/// Whether `token` can go out as `Authorization: Token <token>`.
pub(crate) fn is_sendable(token: &str) -> bool {
    !token.is_empty() && reqwest::header::HeaderValue::from_str(&format!("Token {}", token)).is_ok()
}
