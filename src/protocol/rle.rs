//! # Run-Length Compression (M 2)
//!
//! TIFF/PackBits style run-length coding used for compressed raster lines.
//!
//! ## Encoding
//!
//! ```text
//! control < 128   literal run: control + 1 bytes follow verbatim
//! control >= 128  repeat run:  next byte is repeated 257 - control times
//! ```
//!
//! | Control | Meaning |
//! |---------|---------|
//! | 0x00 | 1 literal byte follows |
//! | 0x7F | 128 literal bytes follow |
//! | 0xFF | repeat next byte 2 times |
//! | 0x80 | repeat next byte 129 times |
//!
//! The raster line length field counts **encoded** bytes, so the decoder
//! stops once that many source bytes are consumed, however many output
//! bytes that produced.

use super::cursor::ByteCursor;

/// Longest literal run a single control byte can describe.
pub const MAX_LITERAL_RUN: usize = 128;

/// Longest repeat run a single control byte can describe.
pub const MAX_REPEAT_RUN: usize = 129;

/// Outcome of expanding one compressed raster line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    /// Source bytes read from the cursor (control and data bytes)
    pub consumed: usize,
    /// False if the stream ran out before `consumed` reached the target
    pub complete: bool,
}

/// Decode run-length data from `cursor` into `out` until `source_len`
/// source bytes have been consumed.
///
/// `out` is cleared first and keeps its allocation, so the same scratch
/// buffer can be reused for every raster line. A run that starts before
/// the limit is always read to its end, even if it overshoots.
pub fn expand_into(cursor: &mut ByteCursor<'_>, source_len: usize, out: &mut Vec<u8>) -> Expansion {
    out.clear();
    let mut consumed = 0;

    while consumed < source_len {
        let Some(control) = cursor.next() else {
            return Expansion {
                consumed,
                complete: false,
            };
        };
        consumed += 1;

        if control >= 128 {
            let count = 256 - control as usize + 1;
            let Some(value) = cursor.next() else {
                return Expansion {
                    consumed,
                    complete: false,
                };
            };
            consumed += 1;
            out.resize(out.len() + count, value);
        } else {
            for _ in 0..=control {
                let Some(value) = cursor.next() else {
                    return Expansion {
                        consumed,
                        complete: false,
                    };
                };
                consumed += 1;
                out.push(value);
            }
        }
    }

    Expansion {
        consumed,
        complete: true,
    }
}

/// Encode `data` with the same scheme.
///
/// Runs of two or more equal bytes become repeat runs; everything else is
/// grouped into literal runs of at most [`MAX_LITERAL_RUN`] bytes.
///
/// ```
/// use ptdecode::protocol::rle;
///
/// assert_eq!(rle::compress(&[7, 7, 7, 1]), vec![0xFE, 7, 0x00, 1]);
/// ```
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_LITERAL_RUN + 1);
    let mut i = 0;

    while i < data.len() {
        let value = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_REPEAT_RUN)
            .take_while(|&&b| b == value)
            .count();

        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(value);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len() && i - start < MAX_LITERAL_RUN {
            if i + 1 < data.len() && data[i] == data[i + 1] {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }

    out
}
