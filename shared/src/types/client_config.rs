use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// REST root of the 3F backend, e.g. `"http://127.0.0.1:8000/api"`.
    pub base_url: String,
    #[serde(default = "default_stream_path")]
    pub stream_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// File holding the auth token (the client-storage analogue).
    ///
    /// An absent or empty file is NOT an error: `connect()` treats it as a
    /// deliberate skip and opens no stream. Prefer overriding the location
    /// via the `NOTIFY_TOKEN_FILE` environment variable in deployments that
    /// manage credentials externally.
    pub token_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// REST root with any trailing slash stripped, so paths can be appended.
    pub fn rest_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full stream endpoint URL (without the token query), e.g.
    /// `"http://127.0.0.1:8000/api/notifications/stream"`.
    pub fn stream_endpoint(&self) -> String {
        format!("{}{}", self.rest_root(), self.stream_path)
    }
}

impl AuthConfig {
    /// Resolve the token file path with the `NOTIFY_TOKEN_FILE` env-var
    /// taking priority over the config field.
    pub fn resolved_token_path(&self) -> String {
        std::env::var("NOTIFY_TOKEN_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.token_path.clone())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: default_max_reconnect_attempts(),
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            history_limit: default_history_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_stream_path() -> String {
    "/notifications/stream".to_string()
}

pub fn default_max_reconnect_attempts() -> u32 {
    5
}

pub fn default_reconnect_base_delay_ms() -> u64 {
    3000
}

/// Matches the backend's default `?limit=` on the history endpoint.
pub fn default_history_limit() -> u32 {
    20
}
