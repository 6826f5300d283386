//! # Byte Cursor
//!
//! Sequential reader over a captured print job. Reading past the end
//! returns `None`; a capture can stop in the middle of any command, so
//! every caller has to handle that case.

/// Forward-only reader over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the first byte.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read the next byte and advance, or `None` when exhausted.
    #[inline]
    pub fn next(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Read a little-endian `u16` (low byte first).
    ///
    /// If only the low byte is available it is still consumed, matching the
    /// way a truncated capture ends mid-operand.
    pub fn next_u16_le(&mut self) -> Option<u16> {
        let lo = self.next()?;
        let hi = self.next()?;
        Some(u16::from_le_bytes([lo, hi]))
    }

    /// Offset of the next byte to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}
