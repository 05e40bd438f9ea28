//! Hardware adapter — bridges board peripherals to domain port traits.
//!
//! Owns the button bank, relay, soil probe, clock, display and host link,
//! exposing them through every port the [`AppService`] needs.  The
//! peripheral types are generic so the same adapter runs against ESP-IDF
//! pin drivers on the board and fake pins in host tests.
//!
//! [`AppService`]: crate::app::service::AppService

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{
    ButtonPort, ClockPort, DisplayPort, HostLinkPort, MoisturePort, PumpPort,
};
use crate::display::StatusLines;
use crate::drivers::button::ButtonBank;
use crate::drivers::pump::RelayPump;
use crate::error::Result;
use crate::fsm::ButtonEvent;
use crate::protocol::LineBuf;
use crate::schedule::TimeOfDay;
use crate::sensors::soil::{RawAdc, SoilSensor};

use super::display::LogDisplay;
use super::host_link::HostLink;
use super::time::{SoftClock, SystemUptime, Uptime};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<'m, I, O, A, W, U = SystemUptime> {
    buttons: ButtonBank<I>,
    pump: RelayPump<O>,
    soil: SoilSensor<A>,
    clock: SoftClock<U>,
    display: LogDisplay,
    host: HostLink<'m, W>,
}

impl<'m, I, O, A, W, U> HardwareAdapter<'m, I, O, A, W, U>
where
    I: InputPin,
    O: OutputPin,
    A: RawAdc,
    W: std::io::Write,
    U: Uptime,
{
    pub fn new(
        buttons: ButtonBank<I>,
        pump: RelayPump<O>,
        soil: SoilSensor<A>,
        clock: SoftClock<U>,
        host: HostLink<'m, W>,
    ) -> Self {
        Self {
            buttons,
            pump,
            soil,
            clock,
            display: LogDisplay::new(),
            host,
        }
    }

    pub fn display(&self) -> &LogDisplay {
        &self.display
    }

    pub fn host(&self) -> &HostLink<'m, W> {
        &self.host
    }

    pub fn pump_running(&self) -> bool {
        self.pump.is_running()
    }

    pub fn clock_synced(&self) -> bool {
        self.clock.is_synced()
    }
}

// ── ButtonPort ────────────────────────────────────────────────

impl<I: InputPin, O, A, W, U: Uptime> ButtonPort for HardwareAdapter<'_, I, O, A, W, U> {
    fn poll_event(&mut self) -> Option<ButtonEvent> {
        if self.buttons.is_empty() {
            self.buttons.scan(self.clock.uptime_ms());
        }
        self.buttons.pop()
    }
}

// ── ClockPort ─────────────────────────────────────────────────

impl<I, O, A, W, U: Uptime> ClockPort for HardwareAdapter<'_, I, O, A, W, U> {
    fn now(&mut self) -> Result<TimeOfDay> {
        self.clock.now()
    }

    fn set_time(&mut self, time: TimeOfDay) -> Result<()> {
        self.clock.set_time(time)
    }
}

// ── MoisturePort ──────────────────────────────────────────────

impl<I, O, A: RawAdc, W, U> MoisturePort for HardwareAdapter<'_, I, O, A, W, U> {
    fn read_averaged(&mut self) -> Result<u16> {
        self.soil.read_averaged()
    }
}

// ── PumpPort ──────────────────────────────────────────────────

impl<I, O: OutputPin, A, W, U> PumpPort for HardwareAdapter<'_, I, O, A, W, U> {
    fn set_pump(&mut self, on: bool) -> Result<()> {
        Ok(self.pump.set(on)?)
    }
}

// ── DisplayPort ───────────────────────────────────────────────

impl<I, O, A, W, U> DisplayPort for HardwareAdapter<'_, I, O, A, W, U> {
    fn show(&mut self, lines: &StatusLines) -> Result<()> {
        self.display.show(lines)
    }
}

// ── HostLinkPort ──────────────────────────────────────────────

impl<I, O, A, W: std::io::Write, U> HostLinkPort for HardwareAdapter<'_, I, O, A, W, U> {
    fn poll_line(&mut self, buf: &mut LineBuf) -> bool {
        self.host.poll_line(buf)
    }

    fn send_line(&mut self, line: &str) -> Result<()> {
        self.host.send_line(line)
    }
}
