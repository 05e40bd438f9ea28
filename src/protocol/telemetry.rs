//! Outbound status telemetry.
//!
//! One decimal integer per control tick, newline terminated:
//!
//! ```text
//!   value = (percent * 10 + mode) * 10 + pump
//!   e.g.  42 %, Manual, pump on  →  "4211\n"
//! ```

use core::fmt::Write;

/// Longest rendered line is "25511\n" (u8 percent, Manual, pump on).
pub const TELEMETRY_LINE_CAPACITY: usize = 8;

pub type TelemetryLine = heapless::String<TELEMETRY_LINE_CAPACITY>;

/// One status report as the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub moisture_percent: u8,
    /// `true` for Manual, `false` for Auto.
    pub manual: bool,
    pub pump_on: bool,
}

impl TelemetryFrame {
    pub fn encode(&self) -> u32 {
        (self.moisture_percent as u32 * 10 + self.manual as u32) * 10 + self.pump_on as u32
    }

    /// Render as the ASCII line sent to the host.
    pub fn to_line(&self) -> TelemetryLine {
        let mut line = TelemetryLine::new();
        // At most 5 digits plus newline; fits the capacity.
        let _ = writeln!(line, "{}", self.encode());
        line
    }

    /// Host-side digit extraction.  `None` if a digit is out of range.
    pub fn decode(value: u32) -> Option<Self> {
        let pump = value % 10;
        let mode = (value / 10) % 10;
        let percent = value / 100;
        if pump > 1 || mode > 1 || percent > 100 {
            return None;
        }
        Some(Self {
            moisture_percent: percent as u8,
            manual: mode == 1,
            pump_on: pump == 1,
        })
    }
}
