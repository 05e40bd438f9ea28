//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the wizard, the host session and the pump decision.
//! It exposes a hardware-agnostic API; all I/O flows through port traits
//! injected at call sites, making the whole service testable with mock
//! adapters.
//!
//! ```text
//!   HostLinkPort ──▶ ┌──────────────────────────┐ ──▶ PumpPort
//!     ButtonPort ──▶ │        AppService         │ ──▶ DisplayPort
//!      ClockPort ◀─▶ │ Fsm · HostSession · band  │ ──▶ HostLinkPort (telemetry)
//!   MoisturePort ──▶ └──────────────────────────┘ ──▶ EventSink
//! ```
//!
//! One [`tick`](AppService::tick) runs, in order: host line → buttons →
//! clock → moisture → decision → override latch → relay → telemetry →
//! display.  No step is fatal.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::display::{self, StatusView};
use crate::error::Result;
use crate::fsm::context::UiContext;
use crate::fsm::{ButtonEvent, Fsm, ManualUiState, OperatingMode, UiChange};
use crate::moisture::{MoistureBand, MoistureConverter};
use crate::protocol::{HostSession, LineBuf, TelemetryFrame};
use crate::schedule::{ScheduleWindow, TimeOfDay};

use super::commands::AppCommand;
use super::events::{AppEvent, PumpSource, TelemetryData};
use super::ports::{
    ButtonPort, ClockPort, DisplayPort, EventSink, HostLinkPort, MoisturePort, PumpPort,
};

/// Upper bound on button presses consumed per tick.
pub const MAX_BUTTON_EVENTS_PER_TICK: usize = 16;

// ───────────────────────────────────────────────────────────────
// Collaborator health
// ───────────────────────────────────────────────────────────────

/// Which collaborators failed on their most recent call.
///
/// Used to log a failure once when it starts and once when it clears,
/// rather than on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Health {
    pub clock: bool,
    pub moisture: bool,
    pub pump: bool,
    pub host_tx: bool,
    pub display: bool,
}

impl Health {
    pub fn is_degraded(&self) -> bool {
        self.clock || self.moisture || self.pump || self.host_tx || self.display
    }
}

/// Turn a port result into an `Option`, logging on state change only.
fn absorb<T>(failing: &mut bool, what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => {
            if core::mem::take(failing) {
                info!("{what} recovered");
            }
            Some(v)
        }
        Err(e) => {
            if *failing {
                debug!("{what} still failing: {e}");
            } else {
                warn!("{what} failed: {e}");
                *failing = true;
            }
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: Fsm,
    ui: UiContext,
    session: HostSession,
    converter: MoistureConverter,
    band: MoistureBand,

    /// Last good clock reading (or host sync).
    now: TimeOfDay,
    /// Last good averaged moisture sample.
    moisture_raw: Option<u16>,
    /// Most recent decision of the active mode, before any override.
    mode_output: bool,
    /// Latched host override.
    override_latch: Option<bool>,
    /// Relay state as last successfully written.
    pump_on: bool,

    health: Health,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.  Boots in Auto with the
    /// configured default window and the pump off.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            fsm: Fsm::default(),
            ui: UiContext::new(config.default_window),
            session: HostSession::new(),
            converter: MoistureConverter::from_config(config),
            band: MoistureBand::from_config(config),
            now: TimeOfDay::MIDNIGHT,
            moisture_raw: None,
            mode_output: false,
            override_latch: None,
            pump_on: false,
            health: Health::default(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "AppService started in {} (window {}-{})",
            self.ui.mode, self.ui.window.start, self.ui.window.stop
        );
        sink.emit(&AppEvent::Started {
            mode: self.ui.mode,
            window: self.ui.window,
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies every port at once, which avoids
    /// juggling several mutable borrows while keeping the boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl HostLinkPort + ButtonPort + ClockPort + MoisturePort + PumpPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Host line (at most one per tick)
        let mut line = LineBuf::new();
        if hw.poll_line(&mut line) {
            self.handle_command(AppCommand::HostLine(line), hw, sink);
        }
        let host_override = self.session.take_override();

        // 2. Buttons
        for _ in 0..MAX_BUTTON_EVENTS_PER_TICK {
            let Some(ev) = hw.poll_event() else { break };
            self.handle_command(AppCommand::Button(ev), hw, sink);
        }

        // 3. Clock
        if let Some(t) = absorb(&mut self.health.clock, "clock read", hw.now()) {
            self.now = t;
        }

        // 4. Moisture
        if let Some(raw) = absorb(&mut self.health.moisture, "moisture read", hw.read_averaged()) {
            self.moisture_raw = Some(raw);
        }

        // 5. Mode decision
        let (decision, source) = self.decide();

        // 6. Override latch
        if self.override_latch.is_some() && decision != self.mode_output {
            info!("host override released by {:?} edge", source);
            self.override_latch = None;
            sink.emit(&AppEvent::OverrideReleased);
        }
        if let Some(on) = host_override {
            info!("host override latched: pump {}", if on { "ON" } else { "OFF" });
            self.override_latch = Some(on);
            sink.emit(&AppEvent::HostOverride { on });
        }
        self.mode_output = decision;

        let (target, source) = match self.override_latch {
            Some(on) => (on, PumpSource::Host),
            None => (decision, source),
        };

        // 7. Relay
        if absorb(&mut self.health.pump, "pump write", hw.set_pump(target)).is_some()
            && target != self.pump_on
        {
            self.pump_on = target;
            info!("pump {} ({:?})", if target { "ON" } else { "OFF" }, source);
            sink.emit(&AppEvent::PumpChanged { on: target, source });
        }

        // 8. Telemetry
        let telemetry = self.build_telemetry();
        let _ = absorb(
            &mut self.health.host_tx,
            "telemetry send",
            hw.send_line(telemetry.frame.to_line().as_str()),
        );
        sink.emit(&AppEvent::Telemetry(telemetry));

        // 9. Display
        let lines = display::render(&self.status_view());
        let _ = absorb(&mut self.health.display, "display update", hw.show(&lines));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one inbound command.  Host lines may set the clock, hence
    /// the [`ClockPort`] bound.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::Button(ev) => self.handle_button(ev, sink),
            AppCommand::HostLine(line) => self.handle_host_line(&line, clock, sink),
        }
    }

    fn handle_button(&mut self, ev: ButtonEvent, sink: &mut impl EventSink) {
        let Some(change) = self.fsm.handle(ev, &mut self.ui) else {
            return;
        };
        let event = match change {
            UiChange::ModeChanged(mode) => {
                if self.override_latch.take().is_some() {
                    info!("host override released by mode change");
                    sink.emit(&AppEvent::OverrideReleased);
                }
                AppEvent::ModeChanged(mode)
            }
            UiChange::StepChanged { from, to } => AppEvent::WizardStep { from, to },
            UiChange::WindowEdited {
                window,
                stop_pushed,
            } => AppEvent::WindowChanged {
                window,
                stop_pushed,
            },
            UiChange::EditRejected { state } => AppEvent::EditRejected(state),
        };
        sink.emit(&event);
    }

    fn handle_host_line(
        &mut self,
        line: &[u8],
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let commands = self.session.process_line(line);
        debug!("host: {} command(s)", commands.len());

        for time in commands.iter().filter_map(|c| c.time()) {
            match clock.set_time(time) {
                Ok(()) => {
                    info!("clock synced to {time}");
                    self.now = time;
                    sink.emit(&AppEvent::ClockSynced(time));
                }
                Err(e) => warn!("clock sync to {time} failed: {e}"),
            }
        }

        if self.session.has_error() {
            sink.emit(&AppEvent::ProtocolError);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the current status.
    pub fn build_telemetry(&self) -> TelemetryData {
        let moisture_percent = self.moisture_percent();
        TelemetryData {
            now: self.now,
            mode: self.ui.mode,
            ui_state: self.fsm.current_state(),
            moisture_raw: self.moisture_raw,
            moisture_percent,
            pump_on: self.pump_on,
            override_active: self.override_latch.is_some(),
            frame: TelemetryFrame {
                moisture_percent,
                manual: self.ui.mode.is_manual(),
                pump_on: self.pump_on,
            },
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.ui.mode
    }

    pub fn ui_state(&self) -> ManualUiState {
        self.fsm.current_state()
    }

    pub fn window(&self) -> ScheduleWindow {
        self.ui.window
    }

    pub fn now(&self) -> TimeOfDay {
        self.now
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    /// Percent wet from the last good reading; 0 before the first one.
    pub fn moisture_percent(&self) -> u8 {
        self.moisture_raw
            .map_or(0, |raw| self.converter.convert(raw))
    }

    pub fn override_active(&self) -> bool {
        self.override_latch.is_some()
    }

    pub fn session(&self) -> &HostSession {
        &self.session
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Decision of the active mode, before the override latch.
    fn decide(&self) -> (bool, PumpSource) {
        match self.ui.mode {
            OperatingMode::Auto => {
                // No reading yet: hold.
                let on = self
                    .moisture_raw
                    .map(|raw| self.converter.convert(raw))
                    .map_or(self.mode_output, |p| self.band.decide(p, self.mode_output));
                (on, PumpSource::Moisture)
            }
            OperatingMode::Manual if self.fsm.current_state().is_editing() => {
                (self.mode_output, PumpSource::Schedule)
            }
            OperatingMode::Manual => (self.ui.window.is_active(self.now), PumpSource::Schedule),
        }
    }

    fn status_view(&self) -> StatusView {
        StatusView {
            mode: self.ui.mode,
            ui_state: self.fsm.current_state(),
            now: self.now,
            window: self.ui.window,
            moisture_percent: self.moisture_percent(),
            pump_on: self.pump_on,
        }
    }
}
