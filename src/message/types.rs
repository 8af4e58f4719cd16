//! Owned IRC message and command types.

use crate::ctcp::Ctcp;

/// A single line of the IRC protocol, in structured form.
///
/// The verb is always stored upper-cased. Parameters are kept in wire
/// order; the last one may contain spaces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Origin of the message (`nick!user@host` or a server name).
    pub prefix: Option<String>,
    /// Command name or three-digit numeric reply.
    pub verb: String,
    /// Ordered parameters, including the trailing one.
    pub params: Vec<String>,
}

impl Message {
    /// Build a message from a verb and parameters.
    ///
    /// Empty parameters are dropped, so optional arguments can be passed
    /// through as empty strings.
    ///
    /// ```
    /// use slirc_client::Message;
    ///
    /// let msg = Message::new("kick", ["#rust", "troll", ""]);
    /// assert_eq!(msg.verb, "KICK");
    /// assert_eq!(msg.params, vec!["#rust", "troll"]);
    /// ```
    pub fn new<I, S>(verb: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Message {
            prefix: None,
            verb: verb.to_ascii_uppercase(),
            params: params
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Attach an origin prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The nickname part of the prefix: everything before `!`, or the
    /// whole prefix when it has no `!`.
    ///
    /// ```
    /// use slirc_client::Message;
    ///
    /// let msg = Message::new("PART", ["#c"]).with_prefix("dave!d@host");
    /// assert_eq!(msg.short_prefix(), Some("dave"));
    /// assert_eq!(Message::new("PING", ["x"]).short_prefix(), None);
    /// ```
    pub fn short_prefix(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(|p| p.split_once('!').map_or(p, |(nick, _)| nick))
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The last parameter, if any.
    pub fn last_param(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Parameter `n` positions from the end (`1` is the last one).
    pub fn param_from_end(&self, n: usize) -> Option<&str> {
        self.params
            .len()
            .checked_sub(n)
            .and_then(|i| self.param(i))
    }
}

/// A decoded command: either a plain message or a CTCP request carried
/// inside a `PRIVMSG`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Any message without a CTCP payload.
    Plain(Message),
    /// A `PRIVMSG` whose trailing parameter is a CTCP frame.
    Ctcp(Message, Ctcp),
}

impl Command {
    /// Classify a message, detecting a CTCP frame in `PRIVMSG`.
    ///
    /// A frame is recognised only when the last of at least two parameters
    /// is wrapped in `\x01` and contains a space after the CTCP verb. A bare
    /// `\x01VERSION\x01` stays a plain message.
    pub fn from_message(message: Message) -> Self {
        if message.verb == "PRIVMSG" && message.params.len() >= 2 {
            if let Some(ctcp) = message.last_param().and_then(Ctcp::from_trailing) {
                return Command::Ctcp(message, ctcp);
            }
        }
        Command::Plain(message)
    }

    /// The underlying wire message.
    pub fn message(&self) -> &Message {
        match self {
            Command::Plain(m) | Command::Ctcp(m, _) => m,
        }
    }

    /// Consume the command, returning the wire message.
    pub fn into_message(self) -> Message {
        match self {
            Command::Plain(m) | Command::Ctcp(m, _) => m,
        }
    }

    /// The CTCP payload, when this is a CTCP command.
    pub fn ctcp(&self) -> Option<&Ctcp> {
        match self {
            Command::Plain(_) => None,
            Command::Ctcp(_, ctcp) => Some(ctcp),
        }
    }

    /// Upper-cased verb.
    pub fn verb(&self) -> &str {
        &self.message().verb
    }

    /// See [`Message::short_prefix`].
    pub fn short_prefix(&self) -> Option<&str> {
        self.message().short_prefix()
    }
}

impl From<Message> for Command {
    fn from(message: Message) -> Self {
        Command::from_message(message)
    }
}
