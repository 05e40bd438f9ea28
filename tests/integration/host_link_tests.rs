//! Host link: the receive mailbox shared with a reader thread, and the
//! session fed from it.

use std::thread;
use std::time::Duration;

use irrigator::adapters::host_link::HostLink;
use irrigator::app::ports::HostLinkPort;
use irrigator::protocol::{HostSession, InboundCommand, LineBuf, LineMailbox, RX_BUFFER_SIZE};
use irrigator::schedule::TimeOfDay;

static RX: LineMailbox = LineMailbox::new();

#[test]
fn reader_thread_hands_lines_to_the_session_in_order() {
    const LINES: u8 = 24;

    let reader = thread::spawn(|| {
        for i in 0..LINES {
            while !RX.is_accepting() {
                thread::sleep(Duration::from_micros(50));
            }
            let line = format!("{}:{:02}:00 AM{}\r\n", (i % 12) + 1, i, i % 2);
            RX.push_bytes(line.as_bytes());
        }
    });

    let mut link = HostLink::new(&RX, Vec::new());
    let mut session = HostSession::new();
    let mut buf = LineBuf::new();
    let mut seen = Vec::new();

    while seen.len() < LINES as usize {
        if !link.poll_line(&mut buf) {
            thread::yield_now();
            continue;
        }
        let cmds = session.process_line(&buf);
        assert_eq!(cmds.len(), 1, "line {:?}", core::str::from_utf8(&buf));
        seen.push(cmds[0]);
    }
    reader.join().unwrap();

    for (i, cmd) in seen.iter().enumerate() {
        let i = i as u8;
        let hour = ((i % 12) + 1) % 12;
        assert_eq!(
            *cmd,
            InboundCommand::TimeSyncWithOverride {
                hour,
                minute: i,
                second: 0,
                on: i % 2 == 1,
            }
        );
    }
    assert_eq!(session.lines_processed(), LINES as u32);
    assert_eq!(link.counters().0, LINES as u32);
}

#[test]
fn bytes_arriving_while_a_line_waits_are_lost() {
    let mb = LineMailbox::new();
    let mut link = HostLink::new(&mb, Vec::new());
    let mut buf = LineBuf::new();

    mb.push_bytes(b"1\n0\n");
    assert!(link.poll_line(&mut buf));
    assert_eq!(&buf[..], b"1");
    assert!(!link.poll_line(&mut buf), "second line was dropped");
    assert_eq!(mb.dropped_bytes(), 2);
}

#[test]
fn overlong_line_is_discarded_and_reception_recovers() {
    let mb = LineMailbox::new();
    let mut link = HostLink::new(&mb, Vec::new());
    let mut buf = LineBuf::new();

    let junk = vec![b'x'; RX_BUFFER_SIZE + 10];
    mb.push_bytes(&junk);
    assert!(mb.resets() >= 1);

    mb.overrun();
    mb.push_bytes(b"6:30:00 PM\n");
    assert!(link.poll_line(&mut buf));

    let mut session = HostSession::new();
    let cmds = session.process_line(&buf);
    assert_eq!(cmds[0].time(), Some(TimeOfDay::new(18, 30, 0)));
}

#[test]
fn telemetry_goes_out_verbatim() {
    let mb = LineMailbox::new();
    let mut link = HostLink::new(&mb, Vec::new());
    link.send_line("4211\n").unwrap();
    link.send_line("0\n").unwrap();
    assert_eq!(link.tx().as_slice(), b"4211\n0\n");
    assert_eq!(link.counters(), (0, 2));
}
