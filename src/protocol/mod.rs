//! Host serial protocol.
//!
//! ```text
//!   bytes ──▶ framing::LineMailbox ──▶ parser::tokens ──▶ parser::parse_token
//!                                                              │
//!                                          HostSession ◀───────┘
//!                                   (last time, pending override, error flag)
//!
//!   AppService ──▶ telemetry::TelemetryFrame ──▶ "4211\n"
//! ```

pub mod framing;
pub mod parser;
pub mod telemetry;

pub use framing::{LineBuf, LineMailbox, RX_BUFFER_SIZE};
pub use parser::{InboundCommand, parse_token, tokens};
pub use telemetry::TelemetryFrame;

use log::{debug, warn};

use crate::schedule::TimeOfDay;

/// Upper bound on tokens in one received buffer (every other byte a
/// terminator).
pub const MAX_COMMANDS_PER_LINE: usize = RX_BUFFER_SIZE / 2;

pub type CommandList = heapless::Vec<InboundCommand, MAX_COMMANDS_PER_LINE>;

/// Protocol-side bookkeeping for the host link.
#[derive(Debug, Default)]
pub struct HostSession {
    last_time: TimeOfDay,
    pending_override: Option<bool>,
    error: bool,
    lines: u32,
    malformed: u32,
}

impl HostSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize and parse one received buffer, applying each command's
    /// side effects in order.  Returns the commands for the caller to act
    /// on (clock sync).
    pub fn process_line(&mut self, line: &[u8]) -> CommandList {
        let mut out = CommandList::new();
        let mut saw_malformed = false;

        for token in tokens(line) {
            let cmd = parse_token(token);
            self.apply(cmd);
            if cmd.is_malformed() {
                saw_malformed = true;
                debug!("host: malformed token ({} bytes)", token.len());
            }
            if out.push(cmd).is_err() {
                warn!("host: command list full, rest of line ignored");
                break;
            }
        }

        self.lines = self.lines.wrapping_add(1);
        self.error = saw_malformed;
        out
    }

    fn apply(&mut self, cmd: InboundCommand) {
        if let Some(t) = cmd.time() {
            self.last_time = t;
        }
        if let Some(on) = cmd.pump_override() {
            self.pending_override = Some(on);
        }
        if cmd.is_malformed() {
            self.last_time = TimeOfDay::MIDNIGHT;
            self.pending_override = None;
            self.malformed = self.malformed.wrapping_add(1);
        }
    }

    /// Take the latest override not yet applied, if any.
    pub fn take_override(&mut self) -> Option<bool> {
        self.pending_override.take()
    }

    /// Sticky error flag: the most recently processed line contained a
    /// malformed token.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Time fields from the most recent time sync (midnight after a
    /// malformed token).
    pub fn last_time(&self) -> TimeOfDay {
        self.last_time
    }

    pub fn lines_processed(&self) -> u32 {
        self.lines
    }

    pub fn malformed_tokens(&self) -> u32 {
        self.malformed
    }
}
