//! # Rendering Module
//!
//! Pixel storage for decoded jobs and conversion to images.
//!
//! ## Modules
//!
//! - [`surface`]: grow-on-demand monochrome bitmap, painted in 8-dot strips
//! - [`export`]: crop and PNG encoding via the `image` crate
//!
//! ## Usage Example
//!
//! ```
//! use ptdecode::render::{Surface, export};
//!
//! let mut surface = Surface::new(64, 64);
//! surface.paint_strip(0, 0, 0xF0);
//!
//! let png = export::to_png(&surface, 1, 8).unwrap();
//! assert!(!png.is_empty());
//! ```

pub mod export;
pub mod surface;

pub use surface::{STRIP_HEIGHT, Surface};
