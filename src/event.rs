//! Events emitted by the client core for the presentation layer to consume.
//!
//! Listeners are registered on an [`EventBus`] and invoked synchronously, in
//! registration order, from inside `poll()`/`send()`. A panicking listener is
//! logged and skipped; it never unwinds into the core or into the listeners
//! registered after it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use tracing::warn;

use crate::message::{Command, Message};

/// Events that the core emits to the consumer (GUI, TUI, bot, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A connection attempt is starting.
    ConnectAttempted { host: String, port: u16 },
    /// The socket is open and registration has been sent.
    Connected,
    /// A previously established connection was closed.
    Disconnected,
    /// A line was read and decoded.
    CommandReceived(Command),
    /// A line is about to be written.
    CommandSent(Message),

    /// Chat text in a channel or private conversation.
    ///
    /// `target` is the channel for channel messages and the other party's
    /// nickname for private ones.
    Message {
        target: String,
        from: String,
        text: String,
    },
    /// A CTCP ACTION (`/me`).
    Action {
        target: String,
        from: String,
        text: String,
    },
    /// A NOTICE; `from` is `None` for server notices without a prefix.
    Notice { from: Option<String>, text: String },
    /// Someone asked for our client version; a reply has been sent.
    VersionRequested { from: String },
    /// Someone told us which client they run.
    VersionReceived { from: String, version: String },

    /// Someone joined a channel.
    UserJoined { channel: String, nick: String },
    /// Someone left a channel.
    UserLeft {
        channel: String,
        nick: String,
        reason: Option<String>,
    },
    /// Someone was kicked from a channel.
    UserKicked {
        channel: String,
        nick: String,
        by: Option<String>,
        reason: Option<String>,
    },
    /// Someone quit; emitted once per channel they were in.
    UserQuit {
        channel: String,
        nick: String,
        reason: Option<String>,
    },
    /// Someone changed nick; emitted once per channel they were in.
    UserRenamed {
        channel: String,
        old_nick: String,
        new_nick: String,
    },
    /// Channel topic set, changed or cleared.
    TopicChanged {
        channel: String,
        topic: Option<String>,
        set_by: Option<String>,
    },
    /// An operator/voice flag changed on a channel member.
    ModeChanged {
        channel: String,
        nick: String,
        mode: String,
        set_by: Option<String>,
    },
    /// A NAMES cycle finished; the roster for `channel` is complete.
    NamesSynced { channel: String },
}

/// Something that wants to observe [`Event`]s.
pub trait Listener {
    fn on_event(&mut self, event: &Event);
}

impl<F> Listener for F
where
    F: FnMut(&Event),
{
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// Forwards every event into an `mpsc` channel.
#[derive(Clone, Debug)]
pub struct ChannelListener(pub mpsc::Sender<Event>);

impl ChannelListener {
    /// Create a listener together with the receiving end of its channel.
    pub fn pair() -> (ChannelListener, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (ChannelListener(tx), rx)
    }
}

impl Listener for ChannelListener {
    fn on_event(&mut self, event: &Event) {
        // A dropped receiver just means nobody is listening any more
        let _ = self.0.send(event.clone());
    }
}

/// Ordered list of listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it will be called after all earlier ones.
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: Listener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every listener in registration order.
    pub fn emit(&mut self, event: Event) {
        for (index, listener) in self.listeners.iter_mut().enumerate() {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(&event)));
            if delivered.is_err() {
                warn!(listener = index, ?event, "event listener panicked");
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
