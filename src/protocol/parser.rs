//! Host line tokenizer and token parser.
//!
//! Accepted token shapes:
//!
//! | token            | command                                  |
//! |------------------|------------------------------------------|
//! | `H:MM:SS AM`     | `TimeSync`                               |
//! | `H:MM:SS PM1`    | `TimeSyncWithOverride { on: true }`      |
//! | `1` / `0`        | `PumpOverride`                           |
//! | anything else    | `Malformed`                              |
//!
//! The time pattern may appear anywhere inside the token; every start
//! offset is tried in order and the first in-range match wins.  Matching is
//! deliberately lenient (leading blanks and signs before each number,
//! optional blanks before the meridiem) because the host software pads
//! its fields inconsistently.

use crate::schedule::TimeOfDay;

/// One parsed host token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundCommand {
    TimeSync { hour: u8, minute: u8, second: u8 },
    PumpOverride { on: bool },
    TimeSyncWithOverride { hour: u8, minute: u8, second: u8, on: bool },
    Malformed,
}

impl InboundCommand {
    /// Time carried by the command, if any (24-hour).
    pub fn time(&self) -> Option<TimeOfDay> {
        match *self {
            Self::TimeSync {
                hour,
                minute,
                second,
            }
            | Self::TimeSyncWithOverride {
                hour,
                minute,
                second,
                ..
            } => Some(TimeOfDay::new(hour, minute, second)),
            _ => None,
        }
    }

    /// Pump override carried by the command, if any.
    pub fn pump_override(&self) -> Option<bool> {
        match *self {
            Self::PumpOverride { on } | Self::TimeSyncWithOverride { on, .. } => Some(on),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// Split a received buffer into tokens on CR/LF, skipping empty ones.
pub fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|&b| b == b'\r' || b == b'\n')
        .filter(|t| !t.is_empty())
}

/// Parse one token.  Total: every input maps to a command.
pub fn parse_token(token: &[u8]) -> InboundCommand {
    for offset in 0..token.len() {
        let rest = &token[offset..];
        let Some(m) = scan_clock(rest) else {
            continue;
        };
        let Some((hour, minute, second)) = m.to_24h() else {
            continue;
        };
        return match rest.get(m.len) {
            Some(b'1') => InboundCommand::TimeSyncWithOverride {
                hour,
                minute,
                second,
                on: true,
            },
            Some(b'0') => InboundCommand::TimeSyncWithOverride {
                hour,
                minute,
                second,
                on: false,
            },
            _ => InboundCommand::TimeSync {
                hour,
                minute,
                second,
            },
        };
    }

    match token {
        b"1" => InboundCommand::PumpOverride { on: true },
        b"0" => InboundCommand::PumpOverride { on: false },
        _ => InboundCommand::Malformed,
    }
}

// ── Clock pattern scanner ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Raw fields of one `H:MM:SS XX` match, before range checks.
#[derive(Debug, Clone, Copy)]
struct ClockMatch {
    hour: i32,
    minute: i32,
    second: i32,
    meridiem: Meridiem,
    /// Bytes consumed from the scan start, meridiem included.
    len: usize,
}

impl ClockMatch {
    /// Range-check and convert to a 24-hour clock.
    fn to_24h(&self) -> Option<(u8, u8, u8)> {
        if !(1..=12).contains(&self.hour)
            || !(0..=59).contains(&self.minute)
            || !(0..=59).contains(&self.second)
        {
            return None;
        }
        let hour = match (self.meridiem, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Pm, h) if h != 12 => h + 12,
            (_, h) => h,
        };
        Some((hour as u8, self.minute as u8, self.second as u8))
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Optional blanks, optional sign, at least one digit.  Saturates.
    fn int(&mut self) -> Option<i32> {
        self.skip_space();
        let negative = match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        let start = self.pos;
        let mut value: i32 = 0;
        while let Some(d @ b'0'..=b'9') = self.peek() {
            value = value.saturating_mul(10).saturating_add((d - b'0') as i32);
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(if negative { -value } else { value })
    }

    fn literal(&mut self, b: u8) -> Option<()> {
        (self.peek() == Some(b)).then(|| self.pos += 1)
    }

    /// Optional blanks, then one or two non-blank bytes.
    fn word2(&mut self) -> Option<&'a [u8]> {
        self.skip_space();
        let start = self.pos;
        while self.pos - start < 2 && self.peek().is_some_and(|b| !is_space(b)) {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.bytes[start..self.pos])
    }
}

/// Try to match the clock pattern at the very start of `bytes`.
fn scan_clock(bytes: &[u8]) -> Option<ClockMatch> {
    let mut c = Cursor { bytes, pos: 0 };
    let hour = c.int()?;
    c.literal(b':')?;
    let minute = c.int()?;
    c.literal(b':')?;
    let second = c.int()?;
    let meridiem = match c.word2()? {
        b"AM" => Meridiem::Am,
        b"PM" => Meridiem::Pm,
        _ => return None,
    };
    Some(ClockMatch {
        hour,
        minute,
        second,
        meridiem,
        len: c.pos,
    })
}
