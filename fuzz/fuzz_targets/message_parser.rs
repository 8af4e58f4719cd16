//! Fuzz target for IRC line parsing
//!
//! Feeds arbitrary text to the line parser and checks that it never panics
//! and that anything it accepts serializes to a line it accepts again.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

use slirc_client::{Command, Message};

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > 8191 {
            return;
        }

        let _ = input.parse::<Command>();

        if let Ok(message) = input.parse::<Message>() {
            if message.params.iter().any(|p| p.contains(['\r', '\n'])) {
                return;
            }
            let reparsed: Message = message
                .to_string()
                .parse()
                .expect("serialized message must parse");
            assert_eq!(reparsed.verb, message.verb);
        }
    }
});
