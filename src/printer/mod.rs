//! # Printer Module
//!
//! Model-specific settings for the label printers whose streams we decode.
//!
//! ## Modules
//!
//! - [`config`]: Printer geometry and model selection

pub mod config;

pub use config::{PrinterConfig, PrinterModel};
