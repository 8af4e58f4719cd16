//! The client facade: one session, its dispatcher and its channel state.

use crate::chan::ChannelExt;
use crate::config::{ClientConfig, ConnectionConfig};
use crate::dispatch::{Context, Dispatcher, UserCommand};
use crate::error::ConnectError;
use crate::event::Listener;
use crate::message::Message;
use crate::state::Channels;
use crate::transport::{Connector, Session, SessionState, TcpConnector};

/// An IRC client driven by [`poll`](Client::poll).
///
/// ```no_run
/// use slirc_client::{Client, ClientConfig, ConnectionConfig, Event};
///
/// let mut client = Client::new(ClientConfig::default());
/// client.subscribe(|event: &Event| println!("{:?}", event));
/// client
///     .connect(ConnectionConfig::new("irc.libera.chat", 6667, "jeb"))
///     .ok();
/// client.handle_input(None, "/join #kerbal");
/// loop {
///     client.poll();
///     std::thread::sleep(std::time::Duration::from_millis(50));
/// }
/// ```
pub struct Client<C: Connector = TcpConnector> {
    session: Session<C>,
    dispatcher: Dispatcher,
    channels: Channels,
    nickname: String,
    version_reply: String,
    epoch: u64,
}

impl Client<TcpConnector> {
    /// A client that connects over plain TCP.
    pub fn new(config: ClientConfig) -> Self {
        let connector = TcpConnector::from_config(&config);
        Client::with_connector(connector, config)
    }
}

impl<C: Connector> Client<C> {
    pub fn with_connector(connector: C, config: ClientConfig) -> Self {
        let version_reply = config.version_reply.clone();
        Client {
            session: Session::new(connector, config),
            dispatcher: Dispatcher::new(),
            channels: Channels::new(),
            nickname: String::new(),
            version_reply,
            epoch: 0,
        }
    }

    /// Register an event listener. Listeners run in registration order.
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: Listener + 'static,
    {
        self.session.subscribe(listener);
    }

    /// Connect and register. See [`Session::connect`].
    pub fn connect(&mut self, params: ConnectionConfig) -> Result<(), ConnectError> {
        self.nickname = params.nickname.clone();
        let result = self.session.connect(params);
        self.sync_epoch();
        result
    }

    /// Send `QUIT` and close for good.
    pub fn disconnect(&mut self) {
        self.session.disconnect();
        self.channels.clear();
    }

    /// Read from the server and process everything that arrived.
    ///
    /// Each line is dispatched before the next one is read out of the
    /// buffer, so a reconnect caused by a handler's reply discards the rest
    /// of the old connection's input.
    pub fn poll(&mut self) {
        let Client {
            session,
            dispatcher,
            channels,
            nickname,
            version_reply,
            ..
        } = self;
        session.poll_with(|session, command| {
            let mut ctx = Context::new(session, channels, nickname, version_reply.as_str());
            dispatcher.dispatch_inbound(&mut ctx, &command);
        });
        self.sync_epoch();
    }

    /// Handle a line typed by the user in the conversation `target`.
    ///
    /// `/verb args` lines go through the outbound table; anything else is
    /// chat text for `target`.
    pub fn handle_input(&mut self, target: Option<&str>, input: &str) {
        let command = if input.starts_with('/') {
            UserCommand::from_input(input)
        } else if let Some(target) = target {
            Some(UserCommand::new("MSG", format!("{} {}", target, input)))
        } else {
            None
        };
        if let Some(command) = command {
            self.run(target, &command);
        }
    }

    /// Send chat text to a channel or nickname.
    pub fn send_message(&mut self, target: &str, text: &str) {
        self.run(None, &UserCommand::new("MSG", format!("{} {}", target, text)));
    }

    /// Send a message as-is.
    pub fn send(&mut self, message: Message) {
        self.session.send(message);
    }

    /// Leave a conversation: channels are parted, private ones just dropped.
    pub fn close_channel(&mut self, handle: &str) {
        if handle.is_channel_name() {
            self.session.send(Message::new("PART", [handle]));
        }
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Our current nickname, following server-confirmed changes.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    fn run(&mut self, target: Option<&str>, command: &UserCommand) {
        let mut ctx = Context::new(
            &mut self.session,
            &mut self.channels,
            &mut self.nickname,
            &self.version_reply,
        )
        .with_target(target);
        self.dispatcher.dispatch_outbound(&mut ctx, command);
    }

    /// Channel state belongs to one connection; drop it when a new one
    /// has been established.
    fn sync_epoch(&mut self) {
        let epoch = self.session.epoch();
        if epoch != self.epoch {
            self.epoch = epoch;
            self.channels.clear();
            if let Some(params) = self.session.params() {
                self.nickname = params.nickname.clone();
            }
        }
    }
}

impl<C: Connector + std::fmt::Debug> std::fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("session", &self.session)
            .field("nickname", &self.nickname)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}
