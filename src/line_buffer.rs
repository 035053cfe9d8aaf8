//! Fixed-capacity line buffer with a write cursor.
//!
//! Every log line is assembled here before it reaches a sink. The buffer
//! never grows: `offset` only moves forward by exactly the bytes written,
//! and a fragment that does not fit leaves `offset` where it was.

use core::fmt::{self, Write};

/// Default line capacity in bytes.
pub const LINE_CAPACITY: usize = 1024;

/// Fragment did not fit in the remaining capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineBufferError {
    #[error("fragment does not fit in line buffer")]
    Truncated,
}

/// Line assembly buffer
pub struct LineBuffer<const N: usize = LINE_CAPACITY> {
    buf: [u8; N],
    offset: usize,
}

impl<const N: usize> LineBuffer<N> {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            offset: 0,
        }
    }

    /// Logically discard contents
    #[inline]
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Total capacity
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Current cursor position
    #[inline]
    pub fn len(&self) -> usize {
        self.offset
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    /// Bytes left before the buffer is full
    #[inline]
    pub fn remaining(&self) -> usize {
        N - self.offset
    }

    /// Append a whole fragment or nothing.
    ///
    /// Returns the number of bytes written. When the cursor is already at
    /// capacity this always fails, even for an empty fragment.
    pub fn append(&mut self, fragment: &str) -> Result<usize, LineBufferError> {
        let bytes = fragment.as_bytes();
        if self.offset >= N || bytes.len() > self.remaining() {
            return Err(LineBufferError::Truncated);
        }
        self.buf[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
        Ok(bytes.len())
    }

    /// Format a fragment in place, all or nothing.
    ///
    /// On overflow the cursor is rolled back to where it was before the call.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<usize, LineBufferError> {
        let start = self.offset;
        if start >= N {
            return Err(LineBufferError::Truncated);
        }
        match fmt::write(self, args) {
            Ok(()) => Ok(self.offset - start),
            Err(_) => {
                self.offset = start;
                Err(LineBufferError::Truncated)
            }
        }
    }

    /// Format into whatever capacity is left, cutting silently.
    ///
    /// The cut lands on a UTF-8 boundary; nothing after the first cut is
    /// written. Returns the number of bytes written.
    pub fn append_truncating(&mut self, args: fmt::Arguments<'_>) -> usize {
        struct Truncating<'a, const M: usize> {
            line: &'a mut LineBuffer<M>,
            full: bool,
        }

        impl<'a, const M: usize> Write for Truncating<'a, M> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                if self.full {
                    return Ok(());
                }
                let remaining = self.line.remaining();
                if s.len() <= remaining {
                    let _ = self.line.append(s);
                    return Ok(());
                }
                let mut end = remaining;
                while !s.is_char_boundary(end) {
                    end -= 1;
                }
                let _ = self.line.append(&s[..end]);
                self.full = true;
                Ok(())
            }
        }

        let start = self.offset;
        let mut writer = Truncating { line: self, full: false };
        let _ = fmt::write(&mut writer, args);
        self.offset - start
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.offset]).unwrap_or("")
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.offset]
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict per-piece writer: a piece that does not fit fails the write.
impl<const N: usize> Write for LineBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        self.append(s).map(|_| ()).map_err(|_| fmt::Error)
    }
}
