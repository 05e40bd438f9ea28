//! Host serial link adapter.
//!
//! Receive side: a [`LineMailbox`] filled by whatever owns the UART RX
//! path (reader task on the board, a test thread on the host).  Transmit
//! side: any `std::io::Write`, which on the board wraps the UART TX driver.

use std::io::Write;

use log::debug;

use crate::app::ports::HostLinkPort;
use crate::error::{CommsError, Result};
use crate::protocol::{LineBuf, LineMailbox};

pub struct HostLink<'m, W> {
    mailbox: &'m LineMailbox,
    tx: W,
    lines_in: u32,
    lines_out: u32,
}

impl<'m, W: Write> HostLink<'m, W> {
    pub fn new(mailbox: &'m LineMailbox, tx: W) -> Self {
        Self {
            mailbox,
            tx,
            lines_in: 0,
            lines_out: 0,
        }
    }

    pub fn mailbox(&self) -> &'m LineMailbox {
        self.mailbox
    }

    pub fn tx(&self) -> &W {
        &self.tx
    }

    /// (lines received, lines sent)
    pub fn counters(&self) -> (u32, u32) {
        (self.lines_in, self.lines_out)
    }
}

impl<W: Write> HostLinkPort for HostLink<'_, W> {
    fn poll_line(&mut self, buf: &mut LineBuf) -> bool {
        if !self.mailbox.take_line(buf) {
            return false;
        }
        self.lines_in = self.lines_in.wrapping_add(1);
        debug!(
            "host rx: {} bytes (dropped so far {}, resets {})",
            buf.len(),
            self.mailbox.dropped_bytes(),
            self.mailbox.resets()
        );
        true
    }

    fn send_line(&mut self, line: &str) -> Result<()> {
        self.tx
            .write_all(line.as_bytes())
            .and_then(|()| self.tx.flush())
            .map_err(|_| CommsError::UartWriteFailed)?;
        self.lines_out = self.lines_out.wrapping_add(1);
        Ok(())
    }
}
