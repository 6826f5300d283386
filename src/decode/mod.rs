//! # Stream Decoder
//!
//! Turns a captured label printer job into a bitmap.
//!
//! ## Architecture
//!
//! ```text
//! bytes → ByteCursor → Decoder ──────────────► Surface → PNG
//!                        │  ▲                     (crop to xmax × ymax)
//!                        │  └── rle::expand_into (after M 2)
//!                        └────► TraceSink (optional)
//! ```
//!
//! ## Example
//!
//! ```
//! use ptdecode::decode::{DecodeOptions, Halt, decode};
//! use ptdecode::protocol::commands;
//!
//! let capture = commands::stream([
//!     commands::init(),
//!     commands::raster_line(&[0xFF, 0x00, 0x81]),
//! ]);
//!
//! let decoded = decode(&capture, &DecodeOptions::default()).unwrap();
//! assert_eq!(decoded.halt, Halt::EndOfStream);
//! assert_eq!((decoded.width, decoded.height), (1, 24));
//! ```

mod decoder;
pub mod job;
mod options;
mod state;
pub mod trace;

pub use decoder::{BIT_IMAGE_FILLER, BLANK_LINE_FILLER_STRIPS, Decoder, RASTER_FILLER, Step};
pub use job::{CancelHandle, DecodeJob};
pub use options::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DecodeOptions};
pub use state::DecoderState;
pub use trace::{Discard, LogSink, TraceEvent, TraceSink};

use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::render::{Surface, export};

// ============================================================================
// OUTCOMES
// ============================================================================

/// Why decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Halt {
    /// All bytes were consumed between commands
    EndOfStream,
    /// A 0x00 byte appeared where an opcode was expected
    NullTerminator { position: usize },
    /// The capture ended inside the command starting at `opcode_position`
    Truncated { opcode_position: usize },
    /// The host stopped the job between batches
    Cancelled,
    /// A fatal [`DecodeError`] at `position`
    Aborted { position: usize },
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::EndOfStream => write!(f, "end of stream"),
            Halt::NullTerminator { position } => write!(f, "NUL terminator at {}", position),
            Halt::Truncated { opcode_position } => {
                write!(f, "truncated command at {}", opcode_position)
            }
            Halt::Cancelled => write!(f, "cancelled"),
            Halt::Aborted { position } => write!(f, "aborted at {}", position),
        }
    }
}

/// Fatal decode errors. Framing is lost after any of these, so decoding
/// never resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorKind {
    #[error("unsupported ESC * graphics mode")]
    UnsupportedGraphicsMode,

    #[error("unrecognized escape sequence")]
    UnrecognizedEscapeSequence,

    #[error("unrecognized opcode")]
    UnrecognizedOpcode,
}

/// A fatal decode error and where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at offset {position}{}", .byte.map(|b| format!(" (byte 0x{:02X})", b)).unwrap_or_default())]
pub struct DecodeError {
    /// 0-based offset of the offending byte
    pub position: usize,
    pub byte: Option<u8>,
    pub kind: DecodeErrorKind,
}

/// A finished decode job.
#[derive(Debug)]
pub struct Decoded {
    pub surface: Surface,
    /// Used width (`xmax`)
    pub width: u32,
    /// Used height (`ymax`)
    pub height: u32,
    /// Decoder state at the halt
    pub state: DecoderState,
    pub halt: Halt,
    pub bytes_consumed: usize,
    pub opcodes: usize,
    /// Trace events, when the job was traced
    pub trace: Option<Vec<TraceEvent>>,
}

impl Decoded {
    /// True if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Black pixels inside the used extent.
    pub fn black_pixels(&self) -> usize {
        self.surface
            .count_black(self.width as usize, self.height as usize)
    }

    /// Encode the used extent as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, export::ExportError> {
        export::to_png(&self.surface, self.width, self.height)
    }

    /// Save the used extent as an image file.
    pub fn save(&self, path: &Path) -> Result<(), export::ExportError> {
        export::save(&self.surface, self.width, self.height, path)
    }
}

/// A fatal decode error together with whatever was drawn before it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DecodeFailure {
    pub error: DecodeError,
    pub partial: Box<Decoded>,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Decode a whole capture synchronously.
pub fn decode(buffer: &[u8], options: &DecodeOptions) -> Result<Decoded, DecodeFailure> {
    if options.trace {
        Decoder::with_sink(buffer, options, Vec::new()).run()
    } else {
        Decoder::new(buffer, options).run()
    }
}

/// Decode a whole capture, reporting trace events to `sink`.
///
/// The result's `trace` field is `None`; the events went to the sink.
pub fn decode_with_sink<S: TraceSink>(
    buffer: &[u8],
    options: &DecodeOptions,
    sink: &mut S,
) -> Result<Decoded, DecodeFailure> {
    Decoder::with_sink(buffer, options, sink).run()
}
