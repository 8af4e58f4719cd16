//! Splitting the inbound byte stream into protocol lines.

use bytes::{Buf, BytesMut};

use crate::error::ProtocolError;

/// Maximum number of bytes buffered while waiting for a line terminator.
pub const MAX_IRC_LINE_LEN: usize = 8191;

/// Find the first `\r\n`-terminated line at the front of `buf`.
///
/// Returns the line without its terminator together with the number of
/// bytes it occupied, terminator included. A lone `\n` does not end a line.
///
/// ```
/// use slirc_client::transport::next_line;
///
/// assert_eq!(next_line(b"PING :x\r\nPONG"), Some((&b"PING :x"[..], 9)));
/// assert_eq!(next_line(b"partial"), None);
/// ```
pub fn next_line(buf: &[u8]) -> Option<(&[u8], usize)> {
    let end = buf.windows(2).position(|w| w == b"\r\n")?;
    Some((&buf[..end], end + 2))
}

/// Accumulates raw bytes and yields complete lines.
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    limit: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_limit(MAX_IRC_LINE_LEN)
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that gives up on lines longer than `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        LineBuffer {
            buf: BytesMut::with_capacity(limit.min(65536) + 1),
            limit,
        }
    }

    /// Storage for the socket to read into.
    pub fn buf_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Remove and return the next complete line.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD. Since decoding happens per
    /// line, a multi-byte character split across two reads stays intact.
    pub fn pop_line(&mut self) -> Option<String> {
        let (line, consumed) = next_line(&self.buf)?;
        let text = String::from_utf8_lossy(line).into_owned();
        self.buf.advance(consumed);
        Some(text)
    }

    /// Discard the partial line if it already exceeds the limit.
    pub fn check_overflow(&mut self) -> Result<(), ProtocolError> {
        let actual = self.buf.len();
        if actual > self.limit {
            self.buf.clear();
            return Err(ProtocolError::MessageTooLong {
                actual,
                limit: self.limit,
            });
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
