//! Client-To-Client Protocol (CTCP) framing.
//!
//! CTCP requests ride inside the trailing parameter of a `PRIVMSG`, wrapped
//! in `\x01` bytes: `\x01VERB [params]\x01`.

use crate::message::{Command, Message};

/// The CTCP frame delimiter.
pub const CTCP_DELIM: char = '\u{1}';

/// A CTCP verb with its optional parameter string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ctcp {
    /// CTCP verb, e.g. `ACTION` or `VERSION`.
    pub verb: String,
    /// Everything after the first space, if present.
    pub params: Option<String>,
}

impl Ctcp {
    pub fn new(verb: impl Into<String>, params: Option<&str>) -> Self {
        Ctcp {
            verb: verb.into(),
            params: params.map(str::to_owned),
        }
    }

    /// Extract a CTCP frame from a trailing parameter.
    ///
    /// Returns `None` when the text is not delimited on both ends or when
    /// the payload has no space after the verb.
    pub(crate) fn from_trailing(text: &str) -> Option<Ctcp> {
        let inner = text
            .strip_prefix(CTCP_DELIM)
            .and_then(|t| t.strip_suffix(CTCP_DELIM))?;
        let (verb, params) = inner.split_once(' ')?;
        Some(Ctcp::new(verb, Some(params)))
    }

    /// Parameters, treating an empty string as absent.
    pub fn params(&self) -> Option<&str> {
        self.params.as_deref().filter(|p| !p.is_empty())
    }

    /// The `\x01`-wrapped payload.
    pub fn to_trailing(&self) -> String {
        let mut s = String::with_capacity(self.verb.len() + 2);
        s.push(CTCP_DELIM);
        s.push_str(&self.verb);
        if let Some(params) = &self.params {
            s.push(' ');
            s.push_str(params);
        }
        s.push(CTCP_DELIM);
        s
    }
}

/// Build a `PRIVMSG` carrying a CTCP frame.
///
/// ```
/// use slirc_client::ctcp::encode_ctcp;
///
/// let cmd = encode_ctcp(None, "#kerbal", "ACTION", Some("waves"));
/// assert_eq!(cmd.to_string(), "PRIVMSG #kerbal :\u{1}ACTION waves\u{1}");
/// assert_eq!(cmd.ctcp().unwrap().verb, "ACTION");
/// ```
pub fn encode_ctcp(
    prefix: Option<&str>,
    target: &str,
    verb: &str,
    params: Option<&str>,
) -> Command {
    let ctcp = Ctcp::new(verb, params);
    let mut message = Message::new("PRIVMSG", [target.to_owned(), ctcp.to_trailing()]);
    message.prefix = prefix.map(str::to_owned);
    Command::Ctcp(message, ctcp)
}
