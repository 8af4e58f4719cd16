//! Fuzz target for splitting a byte stream into lines
//!
//! Whatever the input and however it is chunked, framing must never panic,
//! and the buffer must never hold more than the line limit after a check.

#![no_main]

use libfuzzer_sys::fuzz_target;

use slirc_client::transport::{next_line, LineBuffer, MAX_IRC_LINE_LEN};

fuzz_target!(|data: &[u8]| {
    if let Some((line, consumed)) = next_line(data) {
        assert_eq!(line.len() + 2, consumed);
        assert!(!line.windows(2).any(|w| w == b"\r\n"));
    }

    let chunk = data.first().map_or(1, |b| usize::from(*b).max(1));
    let mut lines = LineBuffer::new();
    for piece in data.chunks(chunk) {
        lines.extend(piece);
        while lines.pop_line().is_some() {}
        let _ = lines.check_overflow();
        assert!(lines.len() <= MAX_IRC_LINE_LEN);
    }
});
