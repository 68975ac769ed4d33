use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::api::error::truncate_body;
use crate::api::AuthError;

/// Login endpoint, relative to the base URL
const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    key: Option<String>,
}

/// Exchanges a username and password for a bearer token.
///
/// Persisting the token is the caller's job; a failed exchange never
/// touches the cache.
#[derive(Clone)]
pub struct Authenticator {
    client: Client,
    login_url: String,
    delay: Duration,
}

impl Authenticator {
    /// `delay` is slept before every attempt, successful or not.
    pub fn new(client: Client, base_url: &str, delay: Duration) -> Self {
        Self {
            client,
            login_url: format!("{}{}", base_url, LOGIN_PATH),
            delay,
        }
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if !self.delay.is_zero() {
            info!(delay_secs = self.delay.as_secs_f32(), "Waiting before authenticating");
            tokio::time::sleep(self.delay).await;
        }

        let response = self
            .client
            .post(&self.login_url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.login_url, error = %e, "Authentication request failed");
                AuthError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Authentication rejected");
            return Err(AuthError::Rejected {
                status,
                body: truncate_body(&body),
            });
        }

        let login: LoginResponse = response.json().await.map_err(AuthError::InvalidBody)?;
        match login.key.filter(|k| !k.is_empty()) {
            Some(token) if super::is_sendable(&token) => {
                info!(username = %username, "Authenticated, new token received");
                Ok(token)
            }
            Some(_) => {
                error!("Authentication failed: token cannot be sent as a header value");
                Err(AuthError::InvalidToken)
            }
            None => {
                error!("Authentication failed: token not found in response");
                Err(AuthError::MissingToken)
            }
        }
    }
}
