//! # Raster Protocol Commands
//!
//! Byte constants and command builders for the ESC/P-style raster protocol
//! spoken by Brother P-touch and QL label printers.
//!
//! ## Protocol Overview
//!
//! A print job is a flat byte stream. Control commands start with ESC,
//! raster data is sent one printer line at a time:
//!
//! - `ESC @`, `ESC i ...`: initialization and device settings
//! - `ESC \ nL nH`: relative horizontal move
//! - `ESC * m nL nH d...`: 24-dot bit image
//! - `G nL nH d...` / `g n1 n2 d...`: one raster line
//! - `M n`: select compression (`M 2` = run-length)
//! - `Z`: blank raster line
//! - `FF`, `CR`, `LF`, `SUB`, `ETX`: paper movement / page end
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! The builders below are used to author captures for tests and demos;
//! the decoder never calls them.

use super::rle;

// ============================================================================
// CONTROL BYTE CONSTANTS
// ============================================================================

/// ESC (Escape) - command prefix byte
pub const ESC: u8 = 0x1B;

/// ETX (End of Text) - soft page end on some models
pub const ETX: u8 = 0x03;

/// LF (Line Feed) - advance one 24-dot bit-image band
pub const LF: u8 = 0x0A;

/// FF (Form Feed) - print page, return to column 0
pub const FF: u8 = 0x0C;

/// CR (Carriage Return) - return to the left margin of the current page
pub const CR: u8 = 0x0D;

/// SUB (Control-Z) - print with feeding, last page
pub const SUB: u8 = 0x1A;

/// Mode byte accepted by `ESC *` (24-dot double density)
pub const BIT_IMAGE_MODE_24: u8 = 39;

/// Compression byte for `M` that turns on run-length (TIFF/PackBits) mode
pub const COMPRESSION_RLE: u8 = 2;

// ============================================================================
// INITIALIZATION AND SETTINGS
// ============================================================================

/// # Initialize (ESC @)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use ptdecode::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Device Setting (ESC i c ...)
///
/// Emits `ESC i` followed by a sub-command byte and its operands. No length
/// checking is done here; the decoder knows the operand count of each
/// sub-command.
pub fn info(code: u8, operands: &[u8]) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(3 + operands.len());
    cmd.extend_from_slice(&[ESC, b'i', code]);
    cmd.extend_from_slice(operands);
    cmd
}

/// # Continuous Page (ESC i P)
///
/// The next page starts right after the widest column printed so far.
#[inline]
pub fn continuous_page() -> Vec<u8> {
    vec![ESC, b'i', b'P']
}

/// # Status Request (ESC i S)
#[inline]
pub fn status_request() -> Vec<u8> {
    vec![ESC, b'i', b'S']
}

// ============================================================================
// POSITIONING
// ============================================================================

/// # Relative Horizontal Position (ESC \ nL nH)
///
/// | Format  | Bytes          |
/// |---------|----------------|
/// | ASCII   | ESC \ nL nH    |
/// | Hex     | 1B 5C nL nH    |
///
/// ```
/// use ptdecode::protocol::commands;
///
/// assert_eq!(commands::relative_x(10), vec![0x1B, 0x5C, 0x0A, 0x00]);
/// ```
#[inline]
pub fn relative_x(dots: u16) -> Vec<u8> {
    let [lo, hi] = u16_le(dots);
    vec![ESC, b'\\', lo, hi]
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// # 24-Dot Bit Image (ESC * 39 nL nH d1...dk)
///
/// `columns` holds one `[top, middle, bottom]` triple per dot column.
///
/// ```
/// use ptdecode::protocol::commands;
///
/// let cmd = commands::bit_image(&[[0xFF, 0x00, 0x81]]);
/// assert_eq!(cmd, vec![0x1B, b'*', 39, 1, 0, 0xFF, 0x00, 0x81]);
/// ```
pub fn bit_image(columns: &[[u8; 3]]) -> Vec<u8> {
    bit_image_with_mode(BIT_IMAGE_MODE_24, columns)
}

/// Same as [`bit_image`] with an explicit mode byte.
pub fn bit_image_with_mode(mode: u8, columns: &[[u8; 3]]) -> Vec<u8> {
    let [lo, hi] = u16_le(columns.len() as u16);
    let mut cmd = Vec::with_capacity(5 + columns.len() * 3);
    cmd.extend_from_slice(&[ESC, b'*', mode, lo, hi]);
    for column in columns {
        cmd.extend_from_slice(column);
    }
    cmd
}

/// # Raster Line (G nL nH d1...dk)
///
/// Uncompressed: `data` is sent verbatim and the length field is its length.
///
/// ```
/// use ptdecode::protocol::commands;
///
/// assert_eq!(
///     commands::raster_line(&[0xFF, 0x00, 0x81]),
///     vec![b'G', 3, 0, 0xFF, 0x00, 0x81]
/// );
/// ```
pub fn raster_line(data: &[u8]) -> Vec<u8> {
    let [lo, hi] = u16_le(data.len() as u16);
    let mut cmd = Vec::with_capacity(3 + data.len());
    cmd.extend_from_slice(&[b'G', lo, hi]);
    cmd.extend_from_slice(data);
    cmd
}

/// Compressed raster line: `data` is run-length encoded and the length field
/// counts encoded bytes. Only meaningful after [`set_compression`]`(true)`.
pub fn raster_line_compressed(data: &[u8]) -> Vec<u8> {
    raster_line(&rle::compress(data))
}

/// # Short Raster Line (g n1 n2 d1...dk)
///
/// QL-500 style record: the first length byte is ignored by the printer,
/// the second one carries the byte count.
pub fn raster_line_short(data: &[u8]) -> Vec<u8> {
    debug_assert!(data.len() <= u8::MAX as usize);
    let mut cmd = Vec::with_capacity(3 + data.len());
    cmd.extend_from_slice(&[b'g', 0, data.len() as u8]);
    cmd.extend_from_slice(data);
    cmd
}

/// # Blank Raster Line (Z)
#[inline]
pub fn blank_line() -> Vec<u8> {
    vec![b'Z']
}

/// # Select Compression (M n)
///
/// `M 2` enables run-length mode, `M 0` is sent by drivers for "none"
/// but leaves the decoder state untouched.
#[inline]
pub fn set_compression(enabled: bool) -> Vec<u8> {
    vec![b'M', if enabled { COMPRESSION_RLE } else { 0 }]
}

// ============================================================================
// PAPER MOVEMENT
// ============================================================================

/// Print command with feeding (Control-Z)
#[inline]
pub fn print_feed() -> Vec<u8> {
    vec![SUB]
}

/// Form feed
#[inline]
pub fn form_feed() -> Vec<u8> {
    vec![FF]
}

/// Carriage return
#[inline]
pub fn carriage_return() -> Vec<u8> {
    vec![CR]
}

/// Line feed
#[inline]
pub fn line_feed() -> Vec<u8> {
    vec![LF]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use ptdecode::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Concatenate several commands into one capture.
pub fn stream<I>(parts: I) -> Vec<u8>
where
    I: IntoIterator<Item = Vec<u8>>,
{
    parts.into_iter().flatten().collect()
}

// ============================================================================
// TESTS
// ============================================================================
