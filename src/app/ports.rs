//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (buttons, RTC, soil probe, relay, LCD, host UART, event
//! sinks) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  Every fallible port returns the firmware-wide
//! [`Result`](crate::error::Result); the service absorbs failures and keeps
//! running.

use crate::display::StatusLines;
use crate::error::Result;
use crate::fsm::ButtonEvent;
use crate::protocol::LineBuf;
use crate::schedule::TimeOfDay;

// ───────────────────────────────────────────────────────────────
// Operator input
// ───────────────────────────────────────────────────────────────

/// Debounced button edges, oldest first.
pub trait ButtonPort {
    /// Next pending press, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<ButtonEvent>;
}

// ───────────────────────────────────────────────────────────────
// Real-time clock
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Current wall-clock time of day.
    fn now(&mut self) -> Result<TimeOfDay>;

    /// Set the clock (host time sync).
    fn set_time(&mut self, time: TimeOfDay) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Soil moisture sensor
// ───────────────────────────────────────────────────────────────

pub trait MoisturePort {
    /// Averaged raw ADC reading.  Higher means drier.
    fn read_averaged(&mut self) -> Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Pump relay
// ───────────────────────────────────────────────────────────────

pub trait PumpPort {
    /// Drive the pump relay.  Called every tick with the desired state.
    fn set_pump(&mut self, on: bool) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Status display
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    fn show(&mut self, lines: &StatusLines) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Host serial link
// ───────────────────────────────────────────────────────────────

/// Line-oriented view of the host UART.
pub trait HostLinkPort {
    /// Copy one completed inbound line into `buf`.  Returns `false` when no
    /// line is waiting.
    fn poll_line(&mut self, buf: &mut LineBuf) -> bool;

    /// Transmit one outbound line (terminator included).
    fn send_line(&mut self, line: &str) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
