//! # Bitmap Surface
//!
//! Monochrome pixel grid written one 8-dot vertical strip at a time.
//!
//! ## Strip Layout
//!
//! One source byte covers 8 rows of a single column. The most significant
//! bit is the top row:
//!
//! ```text
//! byte 0x81 = 1000_0001
//!
//!   y+0  █  bit 7
//!   y+1  ░  bit 6
//!   ...
//!   y+6  ░  bit 1
//!   y+7  █  bit 0
//! ```
//!
//! ## Storage
//!
//! Label streams are printed column by column and the page grows to the
//! right, so pixels are kept per column. Columns and rows grow on demand up
//! to `max_width` x `max_height`; strips outside that bound are clipped.

/// Height of one strip in pixels.
pub const STRIP_HEIGHT: usize = 8;

/// Grow-on-demand monochrome bitmap.
#[derive(Debug, Clone)]
pub struct Surface {
    /// One entry per column, one byte per pixel (1 = black, 0 = white)
    columns: Vec<Vec<u8>>,
    max_width: usize,
    max_height: usize,
    /// Largest `y + 8` of any strip painted so far
    extent_y: usize,
    /// Strips that fell (partly) outside the bound
    clipped: usize,
}

impl Surface {
    /// Create an empty surface that may grow up to the given bound.
    pub fn new(max_width: usize, max_height: usize) -> Self {
        Self {
            columns: Vec::new(),
            max_width,
            max_height,
            extent_y: 0,
            clipped: 0,
        }
    }

    /// Paint an 8-pixel vertical strip at column `x`, top row `y`.
    ///
    /// Bit `i` lands on row `y + 7 - i`; set bits are black, clear bits are
    /// white. Returns false if any part of the strip was clipped.
    pub fn paint_strip(&mut self, x: usize, y: usize, byte: u8) -> bool {
        self.extent_y = self.extent_y.max(y + STRIP_HEIGHT);

        if x >= self.max_width || y + STRIP_HEIGHT > self.max_height {
            self.clipped += 1;
            if x >= self.max_width || y >= self.max_height {
                return false;
            }
        }

        if x >= self.columns.len() {
            self.columns.resize_with(x + 1, Vec::new);
        }
        let bottom = (y + STRIP_HEIGHT).min(self.max_height);
        let column = &mut self.columns[x];
        if column.len() < bottom {
            column.resize(bottom, 0);
        }

        for row in y..bottom {
            let bit = 7 - (row - y);
            column[row] = (byte >> bit) & 1;
        }

        bottom == y + STRIP_HEIGHT
    }

    /// Pixel value at (x, y): true = black. Unpainted pixels read as white.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.columns
            .get(x)
            .and_then(|column| column.get(y))
            .is_some_and(|&p| p != 0)
    }

    /// Read back 8 pixels starting at (x, y) in the same bit order
    /// [`paint_strip`](Self::paint_strip) uses.
    pub fn strip(&self, x: usize, y: usize) -> u8 {
        (0..STRIP_HEIGHT).fold(0u8, |acc, row| (acc << 1) | self.pixel(x, y + row) as u8)
    }

    /// Largest `y + 8` reached by any strip, clipped or not.
    #[inline]
    pub fn extent_y(&self) -> usize {
        self.extent_y
    }

    /// Number of columns that hold at least one painted strip slot.
    #[inline]
    pub fn allocated_width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    #[inline]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Number of strips that did not fit inside the bound.
    #[inline]
    pub fn clipped_strips(&self) -> usize {
        self.clipped
    }

    /// Count of black pixels inside `[0, width) x [0, height)`.
    pub fn count_black(&self, width: usize, height: usize) -> usize {
        self.columns
            .iter()
            .take(width)
            .map(|column| column.iter().take(height).filter(|&&p| p != 0).count())
            .sum()
    }
}
