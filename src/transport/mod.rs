//! Transport layer: sockets, line framing and the connection session.
//!
//! The [`Session`] owns a [`Socket`] obtained from a [`Connector`]. It never
//! spawns threads or waits on the network: the host calls
//! [`Session::poll`] on its own cadence and each call drains whatever the
//! socket has ready.

mod framing;
mod session;
mod socket;

pub use self::framing::{next_line, LineBuffer, MAX_IRC_LINE_LEN};
pub use self::session::{Session, SessionState};
pub use self::socket::{Connector, Socket, TcpConnector, TcpSocket};
