//! # HTTP Server for Capture Decoding
//!
//! Accepts captured print jobs over HTTP and returns the decoded label as a
//! PNG, or the decode trace as JSON.
//!
//! ## Usage
//!
//! ```bash
//! ptdecode serve --listen 0.0.0.0:8080
//!
//! curl --data-binary @job.prn 'http://localhost:8080/api/decode/preview?model=ql1060' > label.png
//! curl --data-binary @job.prn 'http://localhost:8080/api/decode/trace'
//! curl 'http://localhost:8080/api/decode/fetch?url=https://example.com/job.prn&format=json'
//! ```

mod handlers;
mod state;

pub use state::{AppState, DEFAULT_MAX_BODY_BYTES, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::error::PtdecodeError;
use crate::source;

/// Build the router. Exposed so tests can drive it without a socket.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/api/models", get(handlers::models::list))
        .route(
            "/api/decode/preview",
            post(handlers::decode::preview).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/decode/trace",
            post(handlers::decode::trace).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/decode/fetch", get(handlers::decode::fetch))
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use ptdecode::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), ptdecode::error::PtdecodeError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PtdecodeError> {
    let app_state = Arc::new(AppState::new(config.clone(), source::http_client()?));
    let app = router(app_state);

    log::info!("ptdecode HTTP server starting");
    log::info!("Listening on: {}", config.listen_addr);
    log::info!(
        "Upload limit: {} bytes, default model: {:?}",
        config.max_body_bytes,
        config.defaults.model
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PtdecodeError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PtdecodeError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
