//! # Server Tests
//!
//! Drives the HTTP router in-process with `tower::ServiceExt::oneshot`.
//! Fetch tests serve their capture from a one-shot listener on 127.0.0.1,
//! so no outside network access is needed.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use ptdecode::demo;
use ptdecode::protocol::commands::{self, ESC};
use ptdecode::server::{AppState, ServerConfig, router};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn app_with(config: ServerConfig) -> Router {
    router(Arc::new(AppState::new(config, reqwest::Client::new())))
}

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header_str<'a>(response: &'a axum::response::Response, name: &str) -> &'a str {
    response.headers()[name].to_str().unwrap()
}

/// Serve `response` verbatim to the first connection and return its URL.
async fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        // The client may hang up early once it hits the limit
        let _ = socket.write_all(&response).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}/job.prn", addr)
}

fn sized_response(body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

/// Chunked response: no Content-Length, so the size is only known while reading.
fn chunked_response(body: &[u8]) -> Vec<u8> {
    let mut response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n".to_vec();
    for chunk in body.chunks(8) {
        response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        response.extend_from_slice(chunk);
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"0\r\n\r\n");
    response
}

fn small_limit() -> ServerConfig {
    ServerConfig {
        max_body_bytes: 16,
        ..Default::default()
    }
}

// ============================================================================
// PREVIEW
// ============================================================================

#[tokio::test]
async fn test_preview_returns_png() {
    let response = app()
        .oneshot(post("/api/decode/preview", demo::demo_capture()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "content-type"), "image/png");
    assert_eq!(header_str(&response, "x-image-width"), "124");
    assert_eq!(header_str(&response, "x-image-height"), "384");
    assert_eq!(header_str(&response, "x-decode-halt"), "end of stream");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let image = image::load_from_memory(&bytes).unwrap();
    assert_eq!((image.width(), image.height()), (124, 384));
}

#[tokio::test]
async fn test_preview_model_changes_geometry() {
    let capture = commands::stream([commands::init(), commands::blank_line()]);
    let response = app()
        .oneshot(post("/api/decode/preview?model=ql1060", capture))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-image-height"), "1296");
}

#[tokio::test]
async fn test_preview_rejects_unknown_model() {
    let response = app()
        .oneshot(post("/api/decode/preview?model=tsp650", commands::init()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_error_keeps_partial_image() {
    let capture = commands::stream([
        commands::init(),
        commands::raster_line(&[0xFF]),
        vec![ESC, b'Q'],
    ]);
    let response = app()
        .oneshot(post("/api/decode/preview", capture))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(header_str(&response, "content-type"), "image/png");
    assert_eq!(header_str(&response, "x-image-width"), "1");
    assert_eq!(
        header_str(&response, "x-decode-error"),
        "unrecognized escape sequence at offset 7 (byte 0x51)"
    );
}

#[tokio::test]
async fn test_preview_error_without_image_is_json() {
    let response = app()
        .oneshot(post("/api/decode/preview", vec![ESC, b'Q']))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["kind"], "unrecognized_escape_sequence");
    assert_eq!(json["error"]["position"], 1);
}

#[tokio::test]
async fn test_preview_body_limit() {
    let config = ServerConfig {
        max_body_bytes: 16,
        ..Default::default()
    };
    let response = app_with(config)
        .oneshot(post("/api/decode/preview", demo::demo_capture()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// TRACE
// ============================================================================

#[tokio::test]
async fn test_trace_returns_report() {
    let capture = commands::stream([commands::init(), commands::raster_line(&[0xFF, 0x00])]);
    let response = app()
        .oneshot(post("/api/decode/trace", capture))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["width"], 1);
    assert_eq!(json["height"], 16);
    assert_eq!(json["halt"]["reason"], "end_of_stream");
    assert_eq!(json["black_pixels"], 8);
    assert_eq!(json["trace"][0]["message"], "ESC @ initialize");
    assert_eq!(json["trace"][0]["position"], 1);
}

#[tokio::test]
async fn test_trace_can_be_disabled() {
    let response = app()
        .oneshot(post("/api/decode/trace?trace=false", commands::init()))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["trace"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_trace_reports_truncation() {
    let response = app()
        .oneshot(post("/api/decode/trace", vec![ESC, b'@', b'G', 0x04, 0x00, 0xFF]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["halt"]["reason"], "truncated");
    assert_eq!(json["halt"]["opcode_position"], 2);
}

#[tokio::test]
async fn test_trace_reports_unsupported_mode() {
    let capture = commands::stream([
        commands::init(),
        commands::bit_image_with_mode(33, &[[0xFF, 0xFF, 0xFF]]),
    ]);

    let response = app()
        .oneshot(post("/api/decode/trace", capture.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["kind"], "unsupported_graphics_mode");

    let response = app()
        .oneshot(post("/api/decode/trace?lenient=true", capture))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// FETCH AND MODELS
// ============================================================================

#[tokio::test]
async fn test_fetch_requires_http_url() {
    let response = app().oneshot(get("/api/decode/fetch")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app()
        .oneshot(get("/api/decode/fetch?url=file:///etc/passwd"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_models_lists_profiles() {
    let response = app().oneshot(get("/api/models")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let models = json.as_array().unwrap();
    assert_eq!(models.len(), 4);
    assert_eq!(models[0]["id"], "generic");
    assert_eq!(models[3]["id"], "ql1060");
    assert_eq!(models[3]["blank_line_strips"], 162);
}

#[tokio::test]
async fn test_fetch_decodes_remote_capture() {
    let url = serve_once(sized_response(&demo::demo_capture())).await;
    let response = app()
        .oneshot(get(&format!("/api/decode/fetch?url={}", url)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-image-width"), "124");
}

#[tokio::test]
async fn test_fetch_rejects_declared_oversize() {
    let url = serve_once(sized_response(&[0u8; 64])).await;
    let response = app_with(small_limit())
        .oneshot(get(&format!("/api/decode/fetch?url={}", url)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_fetch_stops_reading_past_limit() {
    let url = serve_once(chunked_response(&[0u8; 64])).await;
    let response = app_with(small_limit())
        .oneshot(get(&format!("/api/decode/fetch?url={}", url)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_fetch_under_limit_is_accepted() {
    let capture = commands::stream([commands::init(), commands::raster_line(&[0xFF])]);
    let url = serve_once(chunked_response(&capture)).await;
    let response = app_with(small_limit())
        .oneshot(get(&format!("/api/decode/fetch?url={}&format=json", url)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["width"], 1);
}
