//! Encoding [`Message`] and [`Command`] back into wire text.

use std::fmt::{self, Write};

use super::types::{Command, Message};

/// Write a verb followed by its parameters.
///
/// The last parameter is always sent as a trailing parameter, colon-prefixed
/// even when it holds a single word. Servers accept this form for every
/// command this client sends.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[String]) -> fmt::Result {
    match args.split_last() {
        Some((suffix, middle)) => {
            f.write_str(cmd)?;
            for arg in middle {
                f.write_char(' ')?;
                f.write_str(arg)?;
            }
            f.write_str(" :")?;
            f.write_str(suffix)
        }
        None => f.write_str(cmd),
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_char(':')?;
            f.write_str(prefix)?;
            f.write_char(' ')?;
        }
        write_cmd_freeform(f, &self.verb, &self.params)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.message(), f)
    }
}
