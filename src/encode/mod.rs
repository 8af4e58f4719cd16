//! Encoding IRC messages directly to byte streams.
//!
//! [`IrcEncode`] writes a message plus its `\r\n` terminator to any
//! [`Write`] implementor, which is how the session puts lines on the socket.
//!
//! # Example
//!
//! ```
//! use slirc_client::encode::IrcEncode;
//! use slirc_client::Message;
//!
//! let msg = Message::new("PRIVMSG", ["#channel", "Hello!"]);
//! let mut buf = Vec::new();
//! msg.encode(&mut buf).unwrap();
//!
//! assert_eq!(&buf, b"PRIVMSG #channel :Hello!\r\n");
//! ```

use std::io::{self, Write};

use crate::message::{Command, Message};

/// A trait for encoding IRC protocol elements directly to a byte stream.
pub trait IrcEncode {
    /// Encode this value, including the line terminator, to the given writer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the write fails.
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<usize>;

    /// Encode this value to a new `Vec<u8>`.
    #[must_use]
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(512); // IRC max line length
        let _ = self.encode(&mut buf);
        buf
    }
}

/// Write one line of text followed by `\r\n`.
pub(crate) fn write_line<W: Write>(w: &mut W, line: &str) -> io::Result<usize> {
    w.write_all(line.as_bytes())?;
    w.write_all(b"\r\n")?;
    Ok(line.len() + 2)
}

impl IrcEncode for Message {
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        write_line(writer, &self.to_string())
    }
}

impl IrcEncode for Command {
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        self.message().encode(writer)
    }
}
