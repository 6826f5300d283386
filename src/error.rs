//! # Error Types
//!
//! This module defines the crate-level error used by the CLI, the server
//! and buffer acquisition. The decoder itself reports
//! [`DecodeFailure`](crate::decode::DecodeFailure).

use thiserror::Error;

use crate::decode::DecodeFailure;
use crate::render::export::ExportError;

/// Main error type for ptdecode operations
#[derive(Debug, Error)]
pub enum PtdecodeError {
    /// Capture could not be downloaded
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Capture exceeds the size limit (`size` is what was declared or read so far)
    #[error("Capture too large: at least {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: usize },

    /// Fatal error inside the stream
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeFailure),

    /// Image export error
    #[error("Image error: {0}")]
    Image(#[from] ExportError),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// Invalid argument or input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
