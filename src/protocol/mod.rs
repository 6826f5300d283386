//! # Label Printer Raster Protocol
//!
//! Low-level pieces of the ESC/P-style raster protocol used by Brother
//! P-touch and QL label printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: byte constants and command builders
//! - [`opcode`]: command byte classification
//! - [`cursor`]: forward-only reader over a captured job
//! - [`rle`]: run-length coding for compressed raster lines
//!
//! ## Usage Example
//!
//! ```
//! use ptdecode::protocol::commands;
//!
//! // Build a tiny two-line capture
//! let capture = commands::stream([
//!     commands::init(),
//!     commands::raster_line(&[0xFF, 0x00]),
//!     commands::raster_line(&[0x0F, 0xF0]),
//!     commands::print_feed(),
//! ]);
//! assert_eq!(capture[0], commands::ESC);
//! ```

pub mod commands;
pub mod cursor;
pub mod opcode;
pub mod rle;

pub use cursor::ByteCursor;
pub use opcode::{EscCommand, InfoCommand, Opcode};
