//! Hex dump formatting.
//!
//! Bytes are written as two uppercase hex digits. Every `align`-th byte
//! (1-indexed) is followed by a newline, all others by a space:
//!
//! ```text
//! 00 01 02 03 04 05 06 07
//! 08 09 0A 0B 0C 0D 0E 0F
//! ```

use crate::line_buffer::{LineBuffer, LineBufferError};

/// Alignment used when the caller passes zero.
pub const DEFAULT_ALIGN: usize = 16;

/// Zero means "default".
#[inline]
pub const fn effective_align(align: usize) -> usize {
    if align == 0 {
        DEFAULT_ALIGN
    } else {
        align
    }
}

/// Bytes in traversal order. `reverse` flips the order, never the values.
pub fn traversal(bytes: &[u8], reverse: bool) -> impl Iterator<Item = u8> + '_ {
    let len = bytes.len();
    (0..len).map(move |i| if reverse { bytes[len - 1 - i] } else { bytes[i] })
}

/// Append one byte at traversal position `index`.
pub fn append_hex_byte<const N: usize>(
    line: &mut LineBuffer<N>,
    index: usize,
    byte: u8,
    align: usize,
) -> Result<usize, LineBufferError> {
    let sep = if (index + 1) % effective_align(align) == 0 { '\n' } else { ' ' };
    line.append_fmt(format_args!("{:02X}{}", byte, sep))
}

/// Render the whole dump into `line`.
///
/// Stops at the first byte that does not fit and reports `Truncated`.
pub fn format_hex_dump<const N: usize>(
    line: &mut LineBuffer<N>,
    bytes: &[u8],
    align: usize,
    reverse: bool,
) -> Result<usize, LineBufferError> {
    let start = line.len();
    for (i, byte) in traversal(bytes, reverse).enumerate() {
        append_hex_byte(line, i, byte, align)?;
    }
    Ok(line.len() - start)
}
