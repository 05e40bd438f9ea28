//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::{ManualUiState, OperatingMode};
use crate::protocol::TelemetryFrame;
use crate::schedule::{ScheduleWindow, TimeOfDay};

/// Why the pump is in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpSource {
    /// Auto-mode moisture band.
    Moisture,
    /// Manual-mode daily window.
    Schedule,
    /// Latched host override.
    Host,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the boot mode and window).
    Started {
        mode: OperatingMode,
        window: ScheduleWindow,
    },

    /// Operator toggled Auto ⇄ Manual.
    ModeChanged(OperatingMode),

    /// Wizard moved between sub-states.
    WizardStep {
        from: ManualUiState,
        to: ManualUiState,
    },

    /// Watering window edited.
    WindowChanged {
        window: ScheduleWindow,
        stop_pushed: bool,
    },

    /// A stop-side edit was refused.
    EditRejected(ManualUiState),

    /// Pump relay switched.
    PumpChanged { on: bool, source: PumpSource },

    /// Clock set from a host time sync.
    ClockSynced(TimeOfDay),

    /// Host override latched.
    HostOverride { on: bool },

    /// Host override released by the automatic decision changing.
    OverrideReleased,

    /// A received host line contained a malformed token.
    ProtocolError,

    /// Per-tick status snapshot (also sent to the host).
    Telemetry(TelemetryData),
}

/// A point-in-time status snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub now: TimeOfDay,
    pub mode: OperatingMode,
    pub ui_state: ManualUiState,
    /// Last good averaged reading; `None` until the first success.
    pub moisture_raw: Option<u16>,
    pub moisture_percent: u8,
    pub pump_on: bool,
    pub override_active: bool,
    /// The value as encoded on the wire.
    pub frame: TelemetryFrame,
}
