//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the board, stderr on the host).
//! Per-tick telemetry goes out at `debug` so it does not drown the rest.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                debug!(
                    "TELEM | {} | {} {:?} | moist={}% raw={:?} | pump={}{} | wire={}",
                    t.now,
                    t.mode,
                    t.ui_state,
                    t.moisture_percent,
                    t.moisture_raw,
                    if t.pump_on { "ON" } else { "OFF" },
                    if t.override_active { " (host)" } else { "" },
                    t.frame.encode(),
                );
            }
            AppEvent::Started { mode, window } => {
                info!("START | mode={} window={}-{}", mode, window.start, window.stop);
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {}", mode);
            }
            AppEvent::WizardStep { from, to } => {
                info!("UI    | {:?} -> {:?}", from, to);
            }
            AppEvent::WindowChanged {
                window,
                stop_pushed,
            } => {
                info!(
                    "UI    | window {}-{}{}",
                    window.start,
                    window.stop,
                    if *stop_pushed { " (stop pushed)" } else { "" }
                );
            }
            AppEvent::EditRejected(state) => {
                info!("UI    | edit rejected in {:?}", state);
            }
            AppEvent::PumpChanged { on, source } => {
                info!("PUMP  | {} ({:?})", if *on { "ON" } else { "OFF" }, source);
            }
            AppEvent::ClockSynced(t) => {
                info!("CLOCK | synced to {}", t);
            }
            AppEvent::HostOverride { on } => {
                info!("HOST  | override pump {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::OverrideReleased => {
                info!("HOST  | override released");
            }
            AppEvent::ProtocolError => {
                warn!("HOST  | malformed command");
            }
        }
    }
}
