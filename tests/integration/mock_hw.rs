//! Mock board for integration tests.
//!
//! One struct answers every port the controller needs and records what
//! the controller did with it, so tests can assert on relay writes,
//! telemetry lines and display contents without real peripherals.

use std::collections::VecDeque;

use irrigator::app::events::AppEvent;
use irrigator::app::ports::{
    ButtonPort, ClockPort, DisplayPort, EventSink, HostLinkPort, MoisturePort, PumpPort,
};
use irrigator::display::StatusLines;
use irrigator::error::{ActuatorError, ClockError, CommsError, Result, SensorError};
use irrigator::fsm::ButtonEvent;
use irrigator::protocol::LineBuf;
use irrigator::schedule::TimeOfDay;

// ── MockBoard ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockBoard {
    /// Lines the host will deliver, one per poll.
    pub rx_lines: VecDeque<Vec<u8>>,
    pub buttons: VecDeque<ButtonEvent>,
    pub time: TimeOfDay,
    /// `None` makes the moisture read fail.
    pub raw: Option<u16>,
    pub pump_fails: bool,
    pub tx_fails: bool,

    pub relay_writes: Vec<bool>,
    pub clock_sets: Vec<TimeOfDay>,
    pub sent: Vec<String>,
    pub shown: Vec<StatusLines>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: u16) -> Self {
        Self {
            raw: Some(raw),
            ..Self::default()
        }
    }

    pub fn host_says(&mut self, line: &str) {
        self.rx_lines.push_back(line.as_bytes().to_vec());
    }

    pub fn press(&mut self, events: &[ButtonEvent]) {
        self.buttons.extend(events.iter().copied());
    }

    /// Relay level as last written, off if never written.
    pub fn relay(&self) -> bool {
        self.relay_writes.last().copied().unwrap_or(false)
    }

    pub fn last_telemetry(&self) -> Option<&str> {
        self.sent.last().map(String::as_str)
    }

    pub fn last_screen(&self) -> Option<&StatusLines> {
        self.shown.last()
    }
}

impl HostLinkPort for MockBoard {
    fn poll_line(&mut self, buf: &mut LineBuf) -> bool {
        let Some(line) = self.rx_lines.pop_front() else {
            return false;
        };
        buf.clear();
        buf.extend_from_slice(&line).expect("test line fits the buffer");
        true
    }

    fn send_line(&mut self, line: &str) -> Result<()> {
        if self.tx_fails {
            return Err(CommsError::UartWriteFailed.into());
        }
        self.sent.push(line.to_owned());
        Ok(())
    }
}

impl ButtonPort for MockBoard {
    fn poll_event(&mut self) -> Option<ButtonEvent> {
        self.buttons.pop_front()
    }
}

impl ClockPort for MockBoard {
    fn now(&mut self) -> Result<TimeOfDay> {
        Ok(self.time)
    }

    fn set_time(&mut self, time: TimeOfDay) -> Result<()> {
        if !time.is_valid() {
            return Err(ClockError::InvalidTime.into());
        }
        self.time = time;
        self.clock_sets.push(time);
        Ok(())
    }
}

impl MoisturePort for MockBoard {
    fn read_averaged(&mut self) -> Result<u16> {
        self.raw.ok_or(SensorError::NoSamples.into())
    }
}

impl PumpPort for MockBoard {
    fn set_pump(&mut self, on: bool) -> Result<()> {
        if self.pump_fails {
            return Err(ActuatorError::GpioWriteFailed.into());
        }
        self.relay_writes.push(on);
        Ok(())
    }
}

impl DisplayPort for MockBoard {
    fn show(&mut self, lines: &StatusLines) -> Result<()> {
        self.shown.push(lines.clone());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Keeps every event except per-tick telemetry.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
    pub telemetry: usize,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(_) => self.telemetry += 1,
            other => self.events.push(other.clone()),
        }
    }
}
