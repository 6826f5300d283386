//! Server state and configuration.

use crate::decode::DecodeOptions;

/// Default upload limit for captures (16 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Largest accepted upload or download
    pub max_body_bytes: usize,
    /// Options used when a request does not override them
    pub defaults: DecodeOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            defaults: DecodeOptions::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Client for `GET /api/decode/fetch`
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }
}
