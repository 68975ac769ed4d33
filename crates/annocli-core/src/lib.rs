//! Core library for annocli.
//!
//! Talks to an annotation-platform REST API (projects, tasks, labels, cloud
//! storages) through an authenticated session that caches its token on disk
//! and re-authenticates once when the server rejects it.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{AnnotationClient, ApiError, AuthError, AuthenticatedSession};
pub use auth::{Authenticator, TokenStore};
pub use config::Config;
