//! # Decoder State
//!
//! Drawing cursor and mode flags of one decode job.
//!
//! ```text
//!  xmin          xpos            xmax
//!   │             │               │
//!   ▼             ▼               ▼
//!   ┌─────────────┬───────────────┐ ◄─ ypos (bit images only)
//!   │  page 2     │               │
//!   └─────────────┴───────────────┘ ◄─ ymax
//! ```
//!
//! Invariants kept by the setters:
//! - `xmax` is the largest value `xpos` has ever held
//! - `ymax` is the largest bottom edge (`y + 8`) of any painted strip

use crate::render::STRIP_HEIGHT;

/// Initial capacity of the scratch buffer for one raster line.
const EXPANSION_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderState {
    xpos: usize,
    ypos: usize,
    xmin: usize,
    xmax: usize,
    ymax: usize,
    compression: bool,
    /// Scratch buffer holding one raster line
    pub(super) expansion: Vec<u8>,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            xpos: 0,
            ypos: 0,
            xmin: 0,
            xmax: 0,
            ymax: 0,
            compression: false,
            expansion: Vec::with_capacity(EXPANSION_CAPACITY),
        }
    }
}

impl DecoderState {
    #[inline]
    pub fn xpos(&self) -> usize {
        self.xpos
    }

    #[inline]
    pub fn ypos(&self) -> usize {
        self.ypos
    }

    /// Left margin of the current page
    #[inline]
    pub fn xmin(&self) -> usize {
        self.xmin
    }

    /// High-water mark of `xpos`; the exported image width
    #[inline]
    pub fn xmax(&self) -> usize {
        self.xmax
    }

    /// Bottom edge of the lowest strip; the exported image height
    #[inline]
    pub fn ymax(&self) -> usize {
        self.ymax
    }

    /// Run-length mode is active (`M 2` was seen)
    #[inline]
    pub fn compression(&self) -> bool {
        self.compression
    }

    pub(super) fn set_xpos(&mut self, x: usize) {
        self.xpos = x;
        self.xmax = self.xmax.max(x);
    }

    /// Move right by one column after a raster record.
    pub(super) fn advance_column(&mut self) {
        self.set_xpos(self.xpos + 1);
    }

    pub(super) fn advance_y(&mut self, dots: usize) {
        self.ypos += dots;
    }

    /// Start a new page to the right of everything printed so far.
    pub(super) fn continuous_page(&mut self) {
        self.xmin = self.xmax;
        self.set_xpos(self.xmin);
        self.ypos = 0;
    }

    pub(super) fn carriage_return(&mut self) {
        self.set_xpos(self.xmin);
    }

    pub(super) fn form_feed(&mut self, dots: usize) {
        self.set_xpos(0);
        self.ypos += dots;
    }

    pub(super) fn enable_compression(&mut self) {
        self.compression = true;
    }

    pub(super) fn note_strip(&mut self, y: usize) {
        self.ymax = self.ymax.max(y + STRIP_HEIGHT);
    }
}
