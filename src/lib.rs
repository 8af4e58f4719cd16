//! # slirc-client
//!
//! The protocol core of an IRC client: wire codec, a poll-driven
//! connection session with keepalive and reconnect, verb-keyed command
//! dispatch and per-channel roster synchronization.
//!
//! ## Features
//!
//! - IRC line parsing and serialization, including CTCP framing
//! - Non-blocking, single-threaded session driven by `poll()`
//! - Automatic reconnect after a lost connection
//! - Channel rosters kept in sync from JOIN/PART/KICK/QUIT/NICK/MODE/NAMES
//! - Events for a presentation layer to consume
//! - Optional `serde` support for configuration and state types

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing and building lines
//!
//! ```rust
//! use slirc_client::{Command, Message};
//!
//! let cmd: Command = ":nick!user@host PRIVMSG #chan :hello world".parse().unwrap();
//! assert_eq!(cmd.short_prefix(), Some("nick"));
//! assert_eq!(cmd.message().params, vec!["#chan", "hello world"]);
//!
//! let kick = Message::new("KICK", ["#chan", "troll", "bye"]);
//! assert_eq!(kick.to_string(), "KICK #chan troll :bye");
//! ```
//!
//! ### Driving a client
//!
//! ```no_run
//! use slirc_client::{Client, ClientConfig, ConnectionConfig, Event};
//!
//! let mut client = Client::new(ClientConfig::default());
//! client.subscribe(|event: &Event| {
//!     if let Event::Message { target, from, text } = event {
//!         println!("[{}] <{}> {}", target, from, text);
//!     }
//! });
//! client.connect(ConnectionConfig::new("irc.example.com", 6667, "jeb"))?;
//! loop {
//!     client.poll();
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! # Ok::<(), slirc_client::error::ConnectError>(())
//! ```

pub mod casemap;
pub mod chan;
pub mod client;
pub mod config;
pub mod ctcp;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod event;
pub mod message;
pub mod mode;
pub mod response;
pub mod state;
pub mod transport;

pub use self::casemap::irc_cmp;
pub use self::chan::ChannelExt;
pub use self::client::Client;
pub use self::config::{ClientConfig, ConnectionConfig};
pub use self::ctcp::{encode_ctcp, Ctcp};
pub use self::encode::IrcEncode;
pub use self::error::{ConnectError, MessageParseError, ProtocolError, TransportError};
pub use self::event::{ChannelListener, Event, EventBus, Listener};
pub use self::message::{Command, Message};
pub use self::response::Response;
pub use self::state::{Channel, Channels, Member, Roster, SyncState};
pub use self::transport::{Connector, Session, SessionState, Socket, TcpConnector, MAX_IRC_LINE_LEN};
