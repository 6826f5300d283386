//! Decode options.

use serde::{Deserialize, Serialize};

use crate::printer::PrinterModel;

/// Opcodes processed per cooperative step.
pub const DEFAULT_BATCH_SIZE: usize = 11;

/// Default surface bound in dots.
pub const DEFAULT_MAX_WIDTH: usize = 16384;
pub const DEFAULT_MAX_HEIGHT: usize = 8192;

/// Options for a single decode job.
///
/// Every field has a default, so partial JSON like `{"trace": true}` is
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Caller expects a compressed stream. Informational only: compression
    /// is switched on by `M 2` inside the stream.
    pub compression_hint: bool,

    /// Collect trace events into the result
    pub trace: bool,

    /// Printer profile
    pub model: PrinterModel,

    /// Paint the marker columns next to raster data (0xAA) and bit images (0x55)
    pub draw_filler: bool,

    /// Accept any `ESC *` mode byte instead of only 39
    pub accept_any_graphics_mode: bool,

    /// Opcodes per cooperative step
    pub batch_size: usize,

    /// Surface bound; strips outside it are clipped
    pub max_width: usize,
    pub max_height: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            compression_hint: false,
            trace: false,
            model: PrinterModel::Generic,
            draw_filler: true,
            accept_any_graphics_mode: false,
            batch_size: DEFAULT_BATCH_SIZE,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl DecodeOptions {
    /// Default options with trace collection turned on.
    pub fn traced() -> Self {
        Self {
            trace: true,
            ..Self::default()
        }
    }
}
