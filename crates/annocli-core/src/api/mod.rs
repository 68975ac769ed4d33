//! REST API access for the annotation server.
//!
//! - `AuthenticatedSession`: token injection and one-shot re-authentication
//! - `AnnotationClient`: typed endpoints built on the session
//!
//! The server expects `Authorization: Token <key>`, where the key comes from
//! `POST /api/auth/login`.

pub mod client;
pub mod error;
pub mod session;

pub use client::AnnotationClient;
pub use error::{ApiError, AuthError};
pub use session::AuthenticatedSession;
