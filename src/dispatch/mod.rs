//! Verb-keyed dispatch of inbound server commands and outbound user input.
//!
//! A [`Dispatcher`] holds two independent tables, both filled once by
//! [`Dispatcher::new`]:
//!
//! - **inbound**: normalized server verbs (including numeric replies) to
//!   handlers that update [`Channels`] and emit [`Event`]s. Unknown verbs
//!   are ignored with a `debug!` trace.
//! - **outbound**: user-typed verbs (`MSG`, `ME`, `KICK`, ...) to builders
//!   that send commands. Unknown verbs go to the server verbatim.
//!
//! Handlers touch the outside world only through the [`Link`] they are
//! given, so they can be exercised without a socket.

mod inbound;
mod outbound;

use std::collections::HashMap;

use tracing::debug;

use crate::event::Event;
use crate::message::{Command, Message};
use crate::state::Channels;

/// The outgoing side of a connection, as seen by handlers.
pub trait Link {
    /// Send a structured message.
    fn send(&mut self, message: Message);
    /// Send a line verbatim.
    fn send_raw(&mut self, line: &str);
    /// Notify listeners.
    fn emit(&mut self, event: Event);
}

impl<C: crate::transport::Connector> Link for crate::transport::Session<C> {
    fn send(&mut self, message: Message) {
        crate::transport::Session::send(self, message);
    }

    fn send_raw(&mut self, line: &str) {
        crate::transport::Session::send_raw(self, line);
    }

    fn emit(&mut self, event: Event) {
        crate::transport::Session::emit(self, event);
    }
}

/// Everything a handler may read or change.
pub struct Context<'a> {
    pub(crate) link: &'a mut dyn Link,
    pub(crate) channels: &'a mut Channels,
    pub(crate) nickname: &'a mut String,
    pub(crate) version_reply: &'a str,
    pub(crate) target: Option<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(
        link: &'a mut dyn Link,
        channels: &'a mut Channels,
        nickname: &'a mut String,
        version_reply: &'a str,
    ) -> Self {
        Context {
            link,
            channels,
            nickname,
            version_reply,
            target: None,
        }
    }

    /// Set the conversation (channel or nickname) user input refers to.
    #[must_use]
    pub fn with_target(mut self, target: Option<&'a str>) -> Self {
        self.target = target;
        self
    }

    fn is_me(&self, nick: &str) -> bool {
        *self.nickname == nick
    }
}

/// A verb typed by the user, with its unsplit argument string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserCommand {
    /// Upper-cased verb without the leading `/`.
    pub verb: String,
    /// Everything after the first space.
    pub args: String,
}

impl UserCommand {
    pub fn new(verb: &str, args: impl Into<String>) -> Self {
        UserCommand {
            verb: verb.to_ascii_uppercase(),
            args: args.into(),
        }
    }

    /// Parse `/verb args...`. The leading `/` is optional.
    ///
    /// ```
    /// use slirc_client::dispatch::UserCommand;
    ///
    /// let cmd = UserCommand::from_input("/kick bob flooding").unwrap();
    /// assert_eq!(cmd.verb, "KICK");
    /// assert_eq!(cmd.args, "bob flooding");
    /// assert!(UserCommand::from_input("/").is_none());
    /// ```
    pub fn from_input(input: &str) -> Option<UserCommand> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);
        let (verb, args) = input.split_once(' ').unwrap_or((input, ""));
        if verb.is_empty() {
            return None;
        }
        Some(UserCommand::new(verb, args.trim()))
    }
}

pub(crate) type InboundHandler = fn(&mut Context<'_>, &Command);
pub(crate) type OutboundHandler = fn(&mut Context<'_>, &UserCommand);

/// The two verb tables.
pub struct Dispatcher {
    inbound: HashMap<&'static str, InboundHandler>,
    outbound: HashMap<&'static str, OutboundHandler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut dispatcher = Dispatcher {
            inbound: HashMap::new(),
            outbound: HashMap::new(),
        };
        inbound::register(&mut dispatcher);
        outbound::register(&mut dispatcher);
        dispatcher
    }

    pub(crate) fn on_inbound(&mut self, verb: &'static str, handler: InboundHandler) {
        self.inbound.insert(verb, handler);
    }

    pub(crate) fn on_outbound(&mut self, verb: &'static str, handler: OutboundHandler) {
        self.outbound.insert(verb, handler);
    }

    pub fn handles_inbound(&self, verb: &str) -> bool {
        self.inbound.contains_key(verb)
    }

    pub fn handles_outbound(&self, verb: &str) -> bool {
        self.outbound.contains_key(verb)
    }

    /// Route a command received from the server.
    pub fn dispatch_inbound(&self, ctx: &mut Context<'_>, command: &Command) {
        match self.inbound.get(command.verb()) {
            Some(handler) => handler(ctx, command),
            None => debug!(verb = %command.verb(), "no handler for inbound command"),
        }
    }

    /// Route a command typed by the user.
    pub fn dispatch_outbound(&self, ctx: &mut Context<'_>, command: &UserCommand) {
        match self.outbound.get(command.verb.as_str()) {
            Some(handler) => handler(ctx, command),
            None => {
                let line = format!("{} {}", command.verb, command.args);
                let line = line.trim_end();
                debug!(line = %line, "passing unknown command through");
                ctx.link.send_raw(line);
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut inbound: Vec<_> = self.inbound.keys().collect();
        inbound.sort();
        let mut outbound: Vec<_> = self.outbound.keys().collect();
        outbound.sort();
        f.debug_struct("Dispatcher")
            .field("inbound", &inbound)
            .field("outbound", &outbound)
            .finish()
    }
}

/// A [`Link`] that records everything, for handler tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLink {
    pub sent: Vec<String>,
    pub events: Vec<Event>,
}

#[cfg(test)]
impl Link for RecordingLink {
    fn send(&mut self, message: Message) {
        self.sent.push(message.to_string());
    }

    fn send_raw(&mut self, line: &str) {
        self.sent.push(line.to_owned());
    }

    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
pub(crate) struct Harness {
    pub dispatcher: Dispatcher,
    pub link: RecordingLink,
    pub channels: Channels,
    pub nickname: String,
}

#[cfg(test)]
impl Harness {
    pub fn new(nickname: &str) -> Self {
        Harness {
            dispatcher: Dispatcher::new(),
            link: RecordingLink::default(),
            channels: Channels::new(),
            nickname: nickname.to_owned(),
        }
    }

    pub fn recv(&mut self, line: &str) {
        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => panic!("bad test line {:?}: {}", line, err),
        };
        let mut ctx = Context::new(
            &mut self.link,
            &mut self.channels,
            &mut self.nickname,
            "test-client 1.0",
        );
        self.dispatcher.dispatch_inbound(&mut ctx, &command);
    }

    pub fn input(&mut self, target: Option<&str>, input: &str) {
        let Some(command) = UserCommand::from_input(input) else {
            return;
        };
        let mut ctx = Context::new(
            &mut self.link,
            &mut self.channels,
            &mut self.nickname,
            "test-client 1.0",
        )
        .with_target(target);
        self.dispatcher.dispatch_outbound(&mut ctx, &command);
    }

    pub fn members(&self, channel: &str) -> Vec<String> {
        self.channels
            .get(channel)
            .map(|c| c.roster.members().iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_command_parsing() {
        assert_eq!(
            UserCommand::from_input("/me waves"),
            Some(UserCommand::new("ME", "waves"))
        );
        assert_eq!(
            UserCommand::from_input("/names"),
            Some(UserCommand::new("NAMES", ""))
        );
        assert_eq!(UserCommand::from_input("   "), None);
    }

    #[test]
    fn test_tables_are_registered() {
        let dispatcher = Dispatcher::new();
        for verb in [
            "JOIN", "KICK", "MODE", "NICK", "NOTICE", "PART", "PING", "PONG", "PRIVMSG", "QUIT",
            "TOPIC", "332", "353", "366",
        ] {
            assert!(dispatcher.handles_inbound(verb), "{}", verb);
        }
        for verb in [
            "MSG", "ME", "J", "JOIN", "PART", "KICK", "OP", "DEOP", "VOICE", "DEVOICE", "TOPIC",
        ] {
            assert!(dispatcher.handles_outbound(verb), "{}", verb);
        }
    }

    #[test]
    fn test_unknown_inbound_is_ignored() {
        let mut h = Harness::new("jeb");
        h.recv(":irc.example.com 001 jeb :Welcome");
        assert!(h.link.sent.is_empty());
        assert!(h.link.events.is_empty());
    }

    #[test]
    fn test_unknown_outbound_passes_through() {
        let mut h = Harness::new("jeb");
        h.input(Some("#kerbal"), "/whois bill");
        h.input(None, "/names");
        assert_eq!(h.link.sent, vec!["WHOIS bill", "NAMES"]);
    }
}
