//! Authenticated HTTP session with one-shot re-authentication.
//!
//! Every request goes through [`AuthenticatedSession::execute`]: the current
//! token is injected as `Authorization: Token <token>`, and a 401 on the first
//! attempt triggers exactly one refresh (drop cache, log in again, resend).

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::auth::{Authenticator, TokenStore};
use crate::config::Config;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Media type the annotation server uses for its JSON API
const ACCEPT_MEDIA_TYPE: &str = "application/vnd.cvat+json";

const USER_AGENT: &str = concat!("annocli/", env!("CARGO_PKG_VERSION"));

/// Position within one logical request. Only moves forward, so the retry
/// path runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retry,
}

pub struct AuthenticatedSession {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    authenticator: Authenticator,
    store: TokenStore,
    token: Mutex<Option<String>>,
}

impl AuthenticatedSession {
    /// Build the session and seed it from the token cache. Makes no requests.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_MEDIA_TYPE));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let store = TokenStore::new(config.token_path.clone());
        let token = store.load();

        Ok(Self {
            // Cheap clone, shares the connection pool
            authenticator: Authenticator::new(client.clone(), &config.base_url, config.auth_delay),
            client,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            store,
            token: Mutex::new(token),
        })
    }

    /// Build the session and make sure it holds a token, logging in when the
    /// cache had none.
    pub async fn connect(config: &Config) -> Result<Self, ApiError> {
        let session = Self::new(config)?;
        session.ensure_token().await?;
        Ok(session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Token currently held in memory.
    pub async fn token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    /// Discard the current token and log in again.
    pub async fn reauthenticate(&self) -> Result<String, ApiError> {
        let mut slot = self.token.lock().await;
        self.store.delete();
        *slot = None;
        let token = self.login().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        self.execute(Method::GET, &url, || self.client.get(&url).query(params))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        self.execute(Method::POST, &url, || self.client.post(&url).json(body))
            .await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Run one logical request. `build` is called once per dispatch so the
    /// retry gets a fresh request with the new token.
    async fn execute<T, F>(&self, method: Method, url: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut token = self.ensure_token().await?;
        let mut attempt = Attempt::Initial;

        loop {
            debug!(method = %method, url = url, attempt = ?attempt, "Sending request");
            let response = build()
                .header(header::AUTHORIZATION, Self::auth_value(&token)?)
                .send()
                .await
                .map_err(|e| {
                    error!(method = %method, url = url, error = %e, "Request failed");
                    ApiError::Network(e)
                })?;

            if response.status() == StatusCode::UNAUTHORIZED && attempt == Attempt::Initial {
                attempt = Attempt::Retry;
                token = self.refresh(&token).await?;
                continue;
            }

            return Self::parse_response(&method, url, response).await;
        }
    }

    async fn ensure_token(&self) -> Result<String, ApiError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.login().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Replace a token the server rejected. If another request already
    /// replaced it, reuse that one instead of logging in again.
    async fn refresh(&self, rejected: &str) -> Result<String, ApiError> {
        let mut slot = self.token.lock().await;
        if let Some(current) = slot.as_deref() {
            if current != rejected {
                debug!("Token already refreshed by a concurrent request");
                return Ok(current.to_string());
            }
        }

        info!("Token expired or invalid, re-authenticating");
        self.store.delete();
        *slot = None;
        let token = self.login().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    async fn login(&self) -> Result<String, ApiError> {
        let token = self
            .authenticator
            .authenticate(&self.username, &self.password)
            .await?;
        self.store.save(&token);
        Ok(token)
    }

    fn auth_value(token: &str) -> Result<header::HeaderValue, ApiError> {
        let mut value = header::HeaderValue::from_str(&format!("Token {}", token))?;
        value.set_sensitive(true);
        Ok(value)
    }

    async fn parse_response<T: DeserializeOwned>(
        method: &Method,
        url: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(method = %method, url = url, status = %status, "Request returned an error status");
            return Err(ApiError::from_status(status, &text));
        }

        // Some endpoints answer with an empty body
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }
}
