//! Fuzz target: `LineMailbox`
//!
//! Interprets the input as a script of producer chunks, overruns and
//! consumer takes, and checks that delivered lines are never empty,
//! never contain a terminator and always fit the buffer.
//!
//! cargo fuzz run fuzz_mailbox

#![no_main]

use irrigator::protocol::{LineBuf, LineMailbox, RX_BUFFER_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mb: LineMailbox = LineMailbox::new();
    let mut out = LineBuf::new();
    let mut rest = data;

    while let Some((&op, tail)) = rest.split_first() {
        let take = (op as usize & 0x1f).min(tail.len());
        let (chunk, next) = tail.split_at(take);
        rest = next;

        match op >> 6 {
            0 | 1 => {
                mb.push_bytes(chunk);
            }
            2 => mb.overrun(),
            _ => {}
        }

        if mb.take_line(&mut out) {
            assert!(!out.is_empty());
            assert!(out.len() < RX_BUFFER_SIZE);
            assert!(!out.iter().any(|&b| b == b'\r' || b == b'\n'));
        }
    }
});
