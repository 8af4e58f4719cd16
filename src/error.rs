//! Error types for the IRC client core.
//!
//! This module defines error types for message parsing failures, connection
//! establishment and transport-level I/O. None of these ever escape
//! [`Client::poll`](crate::Client::poll): they are reported through `tracing`
//! and, where applicable, followed by a lifecycle event.

use thiserror::Error;

/// Protocol-level errors raised while turning wire text into commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffered input exceeded the maximum line length without a terminator.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Number of bytes buffered.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing a single IRC line.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// The line does not match the IRC grammar.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Character position where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        context: String,
    },
}

/// Failures of an already-established connection.
///
/// These drive the reconnect path of the session and are never handed to
/// the caller of `poll()` or `send()`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The socket reported an I/O error.
    #[error("transport io error: {0}")]
    Io(#[from] std::io::Error),

    /// No socket is open.
    #[error("not connected")]
    NotConnected,

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Closed,
}

/// Errors raised while establishing a connection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectError {
    /// `connect()` was never given connection parameters.
    #[error("no connection parameters configured")]
    NotConfigured,

    /// The host name could not be resolved.
    #[error("could not resolve {host}: {source}")]
    Resolve {
        /// Host that failed to resolve.
        host: String,
        /// Resolver error.
        #[source]
        source: std::io::Error,
    },

    /// The TCP connection could not be opened.
    #[error("could not connect to {host}:{port}: {source}")]
    Connect {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Socket error.
        #[source]
        source: std::io::Error,
    },

    /// Sending PASS/NICK/USER failed.
    #[error("registration handshake failed: {0}")]
    Handshake(#[source] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MessageTooLong {
            actual: 9000,
            limit: 8191,
        };
        assert_eq!(
            format!("{}", err),
            "message too long: 9000 bytes (limit: 8191)"
        );

        let err = MessageParseError::ParseContext {
            position: 4,
            context: "parsing IRC verb".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "parsing failed at position 4: parsing IRC verb"
        );
    }

    #[test]
    fn test_protocol_error_chaining() {
        let parse_err = MessageParseError::EmptyMessage;
        let protocol_err = ProtocolError::InvalidMessage {
            string: String::new(),
            cause: parse_err.clone(),
        };

        let source = std::error::Error::source(&protocol_err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), parse_err.to_string());
    }

    #[test]
    fn test_connect_error_chaining() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = ConnectError::Connect {
            host: "irc.example.com".to_string(),
            port: 6667,
            source: io_err,
        };
        assert_eq!(
            err.to_string(),
            "could not connect to irc.example.com:6667: connection refused"
        );
        assert!(std::error::Error::source(&err).is_some());

        let err = ConnectError::Handshake(TransportError::Closed);
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "connection closed by peer"
        );
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let err: TransportError = io_err.into();
        assert!(matches!(err, TransportError::Io(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let err: ProtocolError = io_err.into();
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
