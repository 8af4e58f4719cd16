//! IRC numeric replies this client acts on.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 332 - Channel topic, sent on join
    RPL_TOPIC = 332,
    /// 353 - One fragment of a channel's NAMES list
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES list
    RPL_ENDOFNAMES = 366,
}

impl Response {
    /// The three-digit verb as it appears on the wire.
    pub fn verb(&self) -> &'static str {
        match self {
            Response::RPL_TOPIC => "332",
            Response::RPL_NAMREPLY => "353",
            Response::RPL_ENDOFNAMES => "366",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_matches_discriminant() {
        for r in [Response::RPL_TOPIC, Response::RPL_NAMREPLY, Response::RPL_ENDOFNAMES] {
            assert_eq!(r.verb(), format!("{:03}", r as u16));
        }
    }
}
