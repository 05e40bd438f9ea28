//! Console stand-in for the 16x2 character LCD.
//!
//! Logs the status lines whenever they change.  The clock ticks every
//! second, so in practice this logs about once a second, not every tick.

use log::info;

use crate::app::ports::DisplayPort;
use crate::display::StatusLines;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct LogDisplay {
    last: StatusLines,
    updates: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the panel currently shows.
    pub fn contents(&self) -> &StatusLines {
        &self.last
    }

    /// Number of times the content actually changed.
    pub fn updates(&self) -> u32 {
        self.updates
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, lines: &StatusLines) -> Result<()> {
        if *lines != self.last {
            info!("LCD   | {:<16} | {:<16}", lines.top.as_str(), lines.bottom.as_str());
            self.last = lines.clone();
            self.updates = self.updates.wrapping_add(1);
        }
        Ok(())
    }
}
