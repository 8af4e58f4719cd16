//! Socket abstraction and the TCP implementation.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::BytesMut;
use socket2::{SockRef, TcpKeepalive};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ConnectError, TransportError};

/// A connected byte stream the session can poll.
pub trait Socket {
    /// Append every byte that is available right now to `buf`.
    ///
    /// Must not block. Returns `Ok(0)` when nothing is pending and
    /// [`TransportError::Closed`] once the peer has closed the stream.
    fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError>;

    /// Write all of `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Close the stream. Errors are ignored.
    fn close(&mut self);
}

/// Opens [`Socket`]s.
pub trait Connector {
    type Socket: Socket;

    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Socket, ConnectError>;
}

/// Plain TCP connector.
#[derive(Clone, Debug)]
pub struct TcpConnector {
    connect_timeout: Duration,
    write_timeout: Duration,
    keepalive: Option<Duration>,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl TcpConnector {
    pub fn from_config(config: &ClientConfig) -> Self {
        TcpConnector {
            connect_timeout: config.connect_timeout,
            write_timeout: config.write_timeout,
            keepalive: config.tcp_keepalive,
        }
    }

    fn enable_keepalive(stream: &TcpStream, time: Duration) -> std::io::Result<()> {
        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(time)
            .with_interval(Duration::from_secs(30));
        sock.set_tcp_keepalive(&keepalive)
    }
}

impl Connector for TcpConnector {
    type Socket = TcpSocket;

    fn connect(&mut self, host: &str, port: u16) -> Result<TcpSocket, ConnectError> {
        let resolve_err = |source| ConnectError::Resolve {
            host: host.to_owned(),
            source,
        };
        let addrs: Vec<_> = (host, port).to_socket_addrs().map_err(resolve_err)?.collect();
        if addrs.is_empty() {
            return Err(resolve_err(std::io::Error::new(
                ErrorKind::NotFound,
                "no addresses found",
            )));
        }

        let mut last_err = None;
        let mut stream = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.connect_timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        let stream = match stream {
            Some(s) => s,
            None => {
                return Err(ConnectError::Connect {
                    host: host.to_owned(),
                    port,
                    source: last_err
                        .unwrap_or_else(|| std::io::Error::from(ErrorKind::AddrNotAvailable)),
                })
            }
        };

        let connect_err = |source| ConnectError::Connect {
            host: host.to_owned(),
            port,
            source,
        };
        if !self.write_timeout.is_zero() {
            stream
                .set_write_timeout(Some(self.write_timeout))
                .map_err(connect_err)?;
        }
        if let Some(time) = self.keepalive {
            if let Err(e) = Self::enable_keepalive(&stream, time) {
                warn!("failed to enable TCP keepalive: {}", e);
            }
        }
        stream.set_nodelay(true).map_err(connect_err)?;

        Ok(TcpSocket { stream })
    }
}

/// A [`TcpStream`] read in non-blocking bursts and written with a timeout.
#[derive(Debug)]
pub struct TcpSocket {
    stream: TcpStream,
}

impl TcpSocket {
    fn drain(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
        let mut chunk = [0u8; 4096];
        let mut total = 0;
        loop {
            match self.stream.read(&mut chunk) {
                // Hand over what arrived first; the next poll sees EOF again.
                Ok(0) if total > 0 => return Ok(total),
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    total += n;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(total),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Socket for TcpSocket {
    fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
        self.stream.set_nonblocking(true)?;
        let result = self.drain(buf);
        self.stream.set_nonblocking(false)?;
        result
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
