//! Client configuration.
//!
//! Settings come from the environment (a `.env` file is loaded by the binary
//! before this runs). Every option has a default so the client starts with an
//! empty environment.

use std::path::PathBuf;
use std::time::Duration;

/// Application name used for the cache directory path
const APP_NAME: &str = "annocli";

/// Token cache file name
const TOKEN_FILE: &str = "token.json";

const DEFAULT_BASE_URL: &str = "https://sudocodes.com";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";

/// Pause before every login attempt.
/// The upstream service rejects bursts of immediate re-authentication.
const DEFAULT_AUTH_DELAY_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub token_path: PathBuf,
    pub auth_delay: Duration,
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Recognized keys: `BASE_URL`, `API_USERNAME`, `API_PASSWORD`,
    /// `TOKEN_FILE` and `AUTH_DELAY_SECS`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token_path = get("TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);
        let auth_delay = get("AUTH_DELAY_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_AUTH_DELAY_SECS);

        Self {
            base_url: normalize_base_url(&base_url),
            username: get("API_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: get("API_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            token_path,
            auth_delay: Duration::from_secs(auth_delay),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = path;
        self
    }

    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = delay;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `<cache dir>/annocli/token.json`, or `./token.json` on platforms without one.
fn default_token_path() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join(APP_NAME).join(TOKEN_FILE),
        None => PathBuf::from(TOKEN_FILE),
    }
}
