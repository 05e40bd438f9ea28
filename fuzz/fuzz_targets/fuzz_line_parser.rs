//! Fuzz target: `HostSession::process_line`
//!
//! Feeds arbitrary bytes as one received line and checks that parsing
//! never panics, that every time it accepts is in range, and that the
//! error flag agrees with the commands returned.
//!
//! cargo fuzz run fuzz_line_parser

#![no_main]

use irrigator::protocol::HostSession;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut session = HostSession::new();
    let cmds = session.process_line(data);

    for cmd in &cmds {
        if let Some(t) = cmd.time() {
            assert!(t.is_valid(), "parser produced {t:?}");
        }
    }
    assert_eq!(session.has_error(), cmds.iter().any(|c| c.is_malformed()));
    // A trailing malformed token cancels any override earlier in the line.
    if cmds.last().is_some_and(|c| c.is_malformed()) {
        assert!(session.take_override().is_none());
    }
});
