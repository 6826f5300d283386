//! # ptdecode - Label Printer Stream Decoder
//!
//! ptdecode turns captured Brother P-touch / QL print jobs (ESC/P raster
//! streams) back into the image the printer would have produced. It provides:
//!
//! - **Protocol model**: opcode tables, PackBits expansion and command builders
//! - **Decoder**: a resumable state machine that paints an 8-pixel-strip surface
//! - **Export**: cropping to the used extent and PNG encoding
//! - **Server**: an HTTP endpoint that decodes uploads or URLs
//!
//! ## Quick Start
//!
//! ```no_run
//! use ptdecode::{DecodeOptions, decode};
//!
//! let capture = std::fs::read("job.prn")?;
//! let decoded = decode(&capture, &DecodeOptions::default())?;
//!
//! println!("{}x{} dots, halted: {}", decoded.width, decoded.height, decoded.halt);
//! decoded.save(std::path::Path::new("label.png"))?;
//!
//! # Ok::<(), ptdecode::error::PtdecodeError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Opcodes, byte cursor, PackBits, command builders |
//! | [`decode`] | State machine, trace sinks, cooperative jobs |
//! | [`render`] | Bitmap surface and image export |
//! | [`printer`] | Printer model profiles |
//! | [`source`] | Loading captures from files, stdin or URLs |
//! | [`server`] | HTTP decode server |
//! | [`demo`] | Built-in sample capture |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Tested against captures from:
//! - Brother PT-9700PC (360 DPI)
//! - Brother QL-500 and QL-1060N (300 DPI)
//!
//! Other models speaking the same raster dialect decode with the generic
//! profile.

pub mod decode;
pub mod demo;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod source;

// Re-exports for convenience
pub use decode::{DecodeFailure, DecodeOptions, Decoded, decode};
pub use error::PtdecodeError;
pub use printer::{PrinterConfig, PrinterModel};
