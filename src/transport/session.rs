//! Connection lifecycle: registration, polling, keepalive and reconnect.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::config::{ClientConfig, ConnectionConfig};
use crate::encode::{write_line, IrcEncode};
use crate::error::{ConnectError, TransportError};
use crate::event::{Event, EventBus, Listener};
use crate::message::{Command, Message};

use super::framing::LineBuffer;
use super::socket::{Connector, Socket};

/// Where a [`Session`] is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// One physical connection to a server.
///
/// Driven by calling [`poll`](Session::poll) on a steady cadence from a
/// single thread. Reads never block; failures of an established connection
/// trigger one immediate reconnect attempt with the stored parameters.
pub struct Session<C: Connector> {
    connector: C,
    config: ClientConfig,
    params: Option<ConnectionConfig>,
    socket: Option<C::Socket>,
    state: SessionState,
    auto_reconnect: bool,
    lines: LineBuffer,
    last_ping: Instant,
    epoch: u64,
    events: EventBus,
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C, config: ClientConfig) -> Self {
        Session {
            connector,
            config,
            params: None,
            socket: None,
            state: SessionState::Disconnected,
            auto_reconnect: false,
            lines: LineBuffer::new(),
            last_ping: Instant::now(),
            epoch: 0,
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Whether a lost connection would currently be re-established.
    pub fn auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Parameters of the last `connect()` call.
    pub fn params(&self) -> Option<&ConnectionConfig> {
        self.params.as_ref()
    }

    /// Incremented every time a connection is established.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: Listener + 'static,
    {
        self.events.subscribe(listener);
    }

    pub fn emit(&mut self, event: Event) {
        self.events.emit(event);
    }

    /// Open a connection and register with the server.
    ///
    /// Any existing connection is closed first. On failure the error is
    /// logged, the session stays disconnected and is not retried.
    pub fn connect(&mut self, params: ConnectionConfig) -> Result<(), ConnectError> {
        self.params = Some(params);
        self.auto_reconnect = true;
        self.open()
    }

    /// Close the connection for good; lost connections are no longer
    /// re-established until the next [`connect`](Session::connect).
    pub fn disconnect(&mut self) {
        self.auto_reconnect = false;
        self.close();
    }

    /// Read pending input and return every line that decoded.
    ///
    /// Also sends a keepalive `PING` once the ping interval has elapsed.
    pub fn poll(&mut self) -> Vec<Command> {
        let mut received = Vec::new();
        self.poll_with(|_, command| received.push(command));
        received
    }

    /// Read pending input and hand each decoded line to `handle` before the
    /// next one is framed.
    ///
    /// The handler may send through the session. If that drops the
    /// connection, the lines still buffered from it are discarded and not
    /// handed over.
    pub fn poll_with<F>(&mut self, mut handle: F)
    where
        F: FnMut(&mut Self, Command),
    {
        if !self.is_connected() {
            return;
        }

        if let Err(err) = self.fill() {
            self.reconnect(err);
            return;
        }

        let epoch = self.epoch;
        while self.is_connected() && self.epoch == epoch {
            let Some(line) = self.lines.pop_line() else {
                break;
            };
            trace!(line = %line, "<<");
            if line.is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    self.events.emit(Event::CommandReceived(command.clone()));
                    handle(self, command);
                }
                Err(err) => warn!(error = %err, "ignoring malformed line"),
            }
        }
        if let Err(err) = self.lines.check_overflow() {
            warn!(error = %err, "discarding oversized input");
        }

        if self.is_connected() && self.last_ping.elapsed() >= self.config.ping_interval {
            self.last_ping = Instant::now();
            let stamp = Utc::now().timestamp_millis().to_string();
            self.send(Message::new("PING", [stamp]));
        }
    }

    /// Send a message; a write failure triggers a reconnect.
    pub fn send(&mut self, message: Message) {
        if !self.is_connected() {
            warn!(verb = %message.verb, "not connected, dropping message");
            return;
        }
        if let Err(err) = self.write(&message) {
            self.reconnect(err);
        }
    }

    /// Send a line verbatim.
    ///
    /// The line must still decode, both for the `CommandSent` event and to
    /// keep garbage off the wire.
    pub fn send_raw(&mut self, line: &str) {
        let message = match line.parse::<Message>() {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "refusing to send malformed line");
                return;
            }
        };
        if !self.is_connected() {
            warn!(verb = %message.verb, "not connected, dropping message");
            return;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let mut bytes = Vec::with_capacity(line.len() + 2);
        let _ = write_line(&mut bytes, line);
        if let Err(err) = self.transmit(message, line, &bytes) {
            self.reconnect(err);
        }
    }

    fn open(&mut self) -> Result<(), ConnectError> {
        self.close();
        let params = self.params.clone().ok_or(ConnectError::NotConfigured)?;

        info!(host = %params.host, port = params.port, "connecting");
        self.events.emit(Event::ConnectAttempted {
            host: params.host.clone(),
            port: params.port,
        });
        self.state = SessionState::Connecting;

        match self.establish(&params) {
            Ok(()) => {
                self.state = SessionState::Connected;
                self.epoch += 1;
                self.last_ping = Instant::now();
                info!(host = %params.host, port = params.port, "connected");
                self.events.emit(Event::Connected);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "connection failed");
                if let Some(mut socket) = self.socket.take() {
                    socket.close();
                }
                self.state = SessionState::Disconnected;
                Err(err)
            }
        }
    }

    fn establish(&mut self, params: &ConnectionConfig) -> Result<(), ConnectError> {
        let socket = self.connector.connect(&params.host, params.port)?;
        self.socket = Some(socket);
        self.lines.clear();

        if let Some(password) = params.server_password() {
            self.write(&Message::new("PASS", [password]))
                .map_err(ConnectError::Handshake)?;
        }
        self.write(&Message::new("NICK", [params.nickname.as_str()]))
            .map_err(ConnectError::Handshake)?;
        self.write(&Message::new(
            "USER",
            [params.username_or_nick(), "8", "*", params.nickname.as_str()],
        ))
        .map_err(ConnectError::Handshake)?;
        Ok(())
    }

    /// Best-effort `QUIT`, then drop the socket and any buffered input.
    fn close(&mut self) {
        let was_connected = self.is_connected();
        if was_connected {
            let quit = Message::new("QUIT", [self.config.quit_message.as_str()]);
            if let Err(err) = self.write(&quit) {
                debug!(error = %err, "QUIT not delivered");
            }
        }
        if let Some(mut socket) = self.socket.take() {
            socket.close();
        }
        self.lines.clear();
        self.state = SessionState::Disconnected;
        if was_connected {
            info!("disconnected");
            self.events.emit(Event::Disconnected);
        }
    }

    fn reconnect(&mut self, cause: TransportError) {
        warn!(error = %cause, "connection lost");
        if !self.auto_reconnect || !self.is_connected() {
            return;
        }
        self.auto_reconnect = false;
        let result = self.open();
        self.auto_reconnect = true;
        if result.is_err() {
            warn!("reconnect failed, staying disconnected");
        }
    }

    fn fill(&mut self) -> Result<usize, TransportError> {
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        socket.read_available(self.lines.buf_mut())
    }

    fn write(&mut self, message: &Message) -> Result<(), TransportError> {
        let bytes = message.to_bytes();
        let line = message.to_string();
        self.transmit(message.clone(), &line, &bytes)
    }

    fn transmit(&mut self, message: Message, line: &str, bytes: &[u8]) -> Result<(), TransportError> {
        self.events.emit(Event::CommandSent(message));
        trace!(line = %line, ">>");
        let socket = self.socket.as_mut().ok_or(TransportError::NotConnected)?;
        socket.write_all(bytes)
    }
}

impl<C: Connector + std::fmt::Debug> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("connector", &self.connector)
            .field("state", &self.state)
            .field("auto_reconnect", &self.auto_reconnect)
            .field("params", &self.params)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
