//! Decode handlers: PNG preview, JSON trace and decode-by-URL.
//!
//! All handlers accept the same query parameters:
//!
//! | Param | Meaning |
//! |-------|---------|
//! | `model` | printer model (`generic`, `pt9700`, `ql500`, `ql1060`) |
//! | `filler` | draw marker columns (default true) |
//! | `lenient` | accept any `ESC *` mode byte |
//! | `compressed` | compression hint |
//! | `trace` | include trace events (JSON responses trace by default) |

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::decode::{DecodeError, DecodeJob, DecodeOptions, Decoded, Halt, TraceEvent};
use crate::error::PtdecodeError;
use crate::printer::PrinterModel;
use crate::source;

use super::super::state::AppState;

const X_IMAGE_WIDTH: HeaderName = HeaderName::from_static("x-image-width");
const X_IMAGE_HEIGHT: HeaderName = HeaderName::from_static("x-image-height");
const X_DECODE_HALT: HeaderName = HeaderName::from_static("x-decode-halt");
const X_DECODE_ERROR: HeaderName = HeaderName::from_static("x-decode-error");

/// Response format for `GET /api/decode/fetch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Json,
}

/// Query parameters shared by the decode endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DecodeQuery {
    pub model: Option<String>,
    pub filler: Option<bool>,
    pub lenient: Option<bool>,
    pub compressed: Option<bool>,
    pub trace: Option<bool>,
    /// Capture URL (fetch only)
    pub url: Option<String>,
    /// Response format (fetch only)
    #[serde(default)]
    pub format: OutputFormat,
}

impl DecodeQuery {
    /// Apply the query on top of the server defaults.
    pub fn options(&self, defaults: &DecodeOptions) -> Result<DecodeOptions, String> {
        let mut options = defaults.clone();
        if let Some(model) = &self.model {
            options.model = PrinterModel::parse(model)?;
        }
        if let Some(filler) = self.filler {
            options.draw_filler = filler;
        }
        if let Some(lenient) = self.lenient {
            options.accept_any_graphics_mode = lenient;
        }
        if let Some(compressed) = self.compressed {
            options.compression_hint = compressed;
        }
        if let Some(trace) = self.trace {
            options.trace = trace;
        }
        Ok(options)
    }
}

/// JSON body of trace responses.
#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub success: bool,
    pub width: u32,
    pub height: u32,
    pub halt: Halt,
    pub error: Option<DecodeError>,
    pub message: Option<String>,
    pub bytes_consumed: usize,
    pub opcodes: usize,
    pub black_pixels: usize,
    pub trace: Vec<TraceEvent>,
}

impl DecodeReport {
    fn new(decoded: Decoded, error: Option<DecodeError>) -> Self {
        Self {
            success: error.is_none(),
            width: decoded.width,
            height: decoded.height,
            halt: decoded.halt,
            error,
            message: error.map(|e| e.to_string()),
            bytes_consumed: decoded.bytes_consumed,
            opcodes: decoded.opcodes,
            black_pixels: decoded.black_pixels(),
            trace: decoded.trace.unwrap_or_default(),
        }
    }
}

/// Handle POST /api/decode/preview - decode the body and return a PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DecodeQuery>,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let options = query
        .options(&state.config.defaults)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let (decoded, error) = run_job(body.to_vec(), options).await;
    Ok(png_response(decoded, error))
}

/// Handle POST /api/decode/trace - decode the body and return a JSON report.
pub async fn trace(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DecodeQuery>,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let mut options = query
        .options(&state.config.defaults)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    options.trace = query.trace.unwrap_or(true);
    let (decoded, error) = run_job(body.to_vec(), options).await;
    Ok(json_response(decoded, error))
}

/// Handle GET /api/decode/fetch?url=... - download a capture and decode it.
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DecodeQuery>,
) -> Result<Response, (StatusCode, String)> {
    let url = query
        .url
        .as_deref()
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Missing or invalid 'url' parameter".to_string(),
        ))?;
    let mut options = query
        .options(&state.config.defaults)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    if query.format == OutputFormat::Json {
        options.trace = query.trace.unwrap_or(true);
    }

    let data = source::fetch(&state.http, url, state.config.max_body_bytes)
        .await
        .map_err(|e| match e {
            PtdecodeError::TooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()),
            _ => (StatusCode::BAD_GATEWAY, e.to_string()),
        })?;
    log::info!("[fetch] {} bytes from {}", data.len(), url);

    let (decoded, error) = run_job(data, options).await;
    Ok(match query.format {
        OutputFormat::Png => png_response(decoded, error),
        OutputFormat::Json => json_response(decoded, error),
    })
}

/// Decode cooperatively; a fatal error still yields the partial image.
async fn run_job(data: Vec<u8>, options: DecodeOptions) -> (Decoded, Option<DecodeError>) {
    let len = data.len();
    match DecodeJob::new(data, options).run().await {
        Ok(decoded) => {
            log::info!(
                "[decode] {} bytes -> {}x{} ({})",
                len,
                decoded.width,
                decoded.height,
                decoded.halt
            );
            (decoded, None)
        }
        Err(failure) => {
            log::warn!("[decode] {} bytes failed: {}", len, failure.error);
            (*failure.partial, Some(failure.error))
        }
    }
}

fn png_response(decoded: Decoded, error: Option<DecodeError>) -> Response {
    let png = match decoded.to_png() {
        Ok(png) => png,
        Err(e) => {
            let mut report = DecodeReport::new(decoded, error);
            report.success = false;
            report.message.get_or_insert_with(|| e.to_string());
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(report)).into_response();
        }
    };

    let status = if error.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    let mut response = (status, [(header::CONTENT_TYPE, "image/png")], png).into_response();

    let headers = response.headers_mut();
    headers.insert(X_IMAGE_WIDTH, HeaderValue::from(decoded.width));
    headers.insert(X_IMAGE_HEIGHT, HeaderValue::from(decoded.height));
    if let Ok(value) = HeaderValue::from_str(&decoded.halt.to_string()) {
        headers.insert(X_DECODE_HALT, value);
    }
    if let Some(value) = error.and_then(|e| HeaderValue::from_str(&e.to_string()).ok()) {
        headers.insert(X_DECODE_ERROR, value);
    }
    response
}

fn json_response(decoded: Decoded, error: Option<DecodeError>) -> Response {
    let status = if error.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    (status, Json(DecodeReport::new(decoded, error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overrides_defaults() {
        let query = DecodeQuery {
            model: Some("ql1060".to_string()),
            filler: Some(false),
            ..Default::default()
        };
        let options = query.options(&DecodeOptions::default()).unwrap();
        assert_eq!(options.model, PrinterModel::Ql1060);
        assert!(!options.draw_filler);
        assert!(!options.trace);
    }

    #[test]
    fn test_query_rejects_unknown_model() {
        let query = DecodeQuery {
            model: Some("tsp650".to_string()),
            ..Default::default()
        };
        assert!(query.options(&DecodeOptions::default()).is_err());
    }
}
