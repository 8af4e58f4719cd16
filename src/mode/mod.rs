//! Channel mode changes as announced by the server.

mod parse;

use std::fmt;

pub use self::parse::parse_channel_modes;

/// A member flag that shows up in a channel roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberMode {
    /// Channel operator (`o`, shown as `@`).
    Operator,
    /// Voice (`v`, shown as `+`).
    Voice,
}

impl MemberMode {
    pub fn from_char(c: char) -> Option<MemberMode> {
        match c {
            'o' => Some(MemberMode::Operator),
            'v' => Some(MemberMode::Voice),
            _ => None,
        }
    }
}

/// One `+x`/`-x` entry of a MODE line, with its argument if it took one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange {
    /// `true` for `+`, `false` for `-`.
    pub set: bool,
    /// Mode letter.
    pub mode: char,
    /// Argument consumed by this mode.
    pub arg: Option<String>,
}

impl ModeChange {
    /// The member flag this change toggles, if any.
    pub fn member_mode(&self) -> Option<MemberMode> {
        MemberMode::from_char(self.mode)
    }
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.set { '+' } else { '-' }, self.mode)
    }
}
