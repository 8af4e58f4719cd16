//! Decoding wire lines into [`Message`] and [`Command`].

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};

use super::nom_parser::ParsedMessage;
use super::types::{Command, Message};

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ProtocolError::InvalidMessage {
                string: s.to_owned(),
                cause: MessageParseError::EmptyMessage,
            });
        }

        let parsed = ParsedMessage::parse(line).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })?;

        Ok(Message {
            prefix: parsed.prefix.map(str::to_owned),
            verb: parsed.verb.to_ascii_uppercase(),
            params: parsed
                .params
                .into_iter()
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect(),
        })
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Command, Self::Err> {
        s.parse::<Message>().map(Command::from_message)
    }
}
