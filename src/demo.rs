//! # Demo Capture
//!
//! Builds a small but realistic QL-style job: a vendor preamble, the usual
//! `ESC i` setup block, compressed raster lines and a few blank lines.
//! Used by `ptdecode demo` and the integration tests.

use crate::protocol::commands;

/// Columns of drawn raster data in the demo label.
pub const DEMO_COLUMNS: usize = 120;

/// Strips per raster line (128 dots tall).
pub const DEMO_STRIPS: usize = 16;

/// Blank lines after the drawing.
pub const DEMO_BLANK_LINES: usize = 4;

/// Preamble bytes sent before the first ESC.
pub const DEMO_PREAMBLE: usize = 64;

/// One raster line of the demo drawing: a frame with a diagonal stripe.
pub fn demo_column(column: usize) -> Vec<u8> {
    (0..DEMO_STRIPS)
        .map(|strip| {
            if column < 2 || column >= DEMO_COLUMNS - 2 {
                return 0xFF;
            }
            let mut byte = 0u8;
            if strip == 0 {
                byte |= 0xC0;
            }
            if strip == DEMO_STRIPS - 1 {
                byte |= 0x03;
            }
            let y = (column * 2) % (DEMO_STRIPS * 8);
            if y / 8 == strip {
                byte |= 0x80 >> (y % 8);
            }
            byte
        })
        .collect()
}

/// The full demo job.
pub fn demo_capture() -> Vec<u8> {
    let mut parts = vec![
        vec![0x00; DEMO_PREAMBLE],
        commands::init(),
        commands::info(b'a', &[0x01]),
        commands::info(b'z', &[0x86, 0x0A, 0x3E, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]),
        commands::info(b'M', &[0x40]),
        commands::info(b'd', &[0x23, 0x00]),
        commands::set_compression(true),
    ];
    parts.extend((0..DEMO_COLUMNS).map(|c| commands::raster_line_compressed(&demo_column(c))));
    parts.extend((0..DEMO_BLANK_LINES).map(|_| commands::blank_line()));
    parts.push(commands::print_feed());
    commands::stream(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_column_frame() {
        assert_eq!(demo_column(0), vec![0xFF; DEMO_STRIPS]);
        let middle = demo_column(10);
        assert_eq!(middle[0] & 0xC0, 0xC0);
        assert_eq!(middle[DEMO_STRIPS - 1] & 0x03, 0x03);
    }

    #[test]
    fn test_demo_capture_starts_with_preamble() {
        let capture = demo_capture();
        assert!(capture[..DEMO_PREAMBLE].iter().all(|&b| b == 0));
        assert_eq!(capture[DEMO_PREAMBLE], commands::ESC);
        assert_eq!(*capture.last().unwrap(), commands::SUB);
    }
}
