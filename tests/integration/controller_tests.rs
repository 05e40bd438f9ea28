//! End-to-end controller behaviour against the mock board: auto band,
//! manual schedule, wizard edits, host overrides and fault absorption.

use crate::mock_hw::{MockBoard, RecordingSink};

use irrigator::app::commands::AppCommand;
use irrigator::app::events::{AppEvent, PumpSource};
use irrigator::app::service::{AppService, MAX_BUTTON_EVENTS_PER_TICK};
use irrigator::config::SystemConfig;
use irrigator::fsm::{ButtonEvent, ManualUiState, OperatingMode};
use irrigator::schedule::{ScheduleWindow, TimeOfDay};

// Raw readings against the default 4095 full scale.
const DRY: u16 = 4000; // 2 %
const MID: u16 = 2457; // 40 %
const WET: u16 = 1000; // 75 %

fn started(config: &SystemConfig) -> (AppService, RecordingSink) {
    let mut app = AppService::new(config);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, sink)
}

fn manual_app(window: ScheduleWindow) -> (AppService, MockBoard, RecordingSink) {
    let config = SystemConfig {
        default_window: window,
        ..SystemConfig::default()
    };
    let (mut app, mut sink) = started(&config);
    let mut hw = MockBoard::with_raw(WET);
    hw.press(&[ButtonEvent::Mode]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.mode(), OperatingMode::Manual);
    (app, hw, sink)
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boots_in_auto_with_pump_off() {
    let (app, sink) = started(&SystemConfig::default());
    assert_eq!(app.mode(), OperatingMode::Auto);
    assert_eq!(app.ui_state(), ManualUiState::Normal);
    assert!(!app.pump_on());
    assert!(matches!(
        sink.events[0],
        AppEvent::Started {
            mode: OperatingMode::Auto,
            ..
        }
    ));
}

#[test]
fn no_reading_yet_keeps_pump_off_and_reports_zero() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::new();
    app.tick(&mut hw, &mut sink);

    assert!(!hw.relay());
    assert_eq!(app.moisture_percent(), 0);
    assert_eq!(hw.last_telemetry(), Some("0\n"));
    assert!(app.health().moisture);
}

// ── Auto mode ─────────────────────────────────────────────────

#[test]
fn auto_follows_the_hysteresis_band() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::new();

    let mut steps = Vec::new();
    for raw in [DRY, MID, WET, MID, DRY] {
        hw.raw = Some(raw);
        app.tick(&mut hw, &mut sink);
        steps.push(hw.relay());
    }

    assert_eq!(steps, vec![true, true, false, false, true]);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::PumpChanged {
                source: PumpSource::Moisture,
                ..
            }
        )),
        3
    );
}

#[test]
fn relay_is_written_every_tick_but_changes_reported_once() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(DRY);
    for _ in 0..5 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.relay_writes, vec![true; 5]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PumpChanged { .. })), 1);
}

#[test]
fn telemetry_line_tracks_state() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(DRY);
    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.last_telemetry(), Some("201\n"));

    hw.raw = Some(WET);
    hw.press(&[ButtonEvent::Mode]);
    app.tick(&mut hw, &mut sink);
    // Manual at midnight is outside the 08:00-09:00 default window.
    assert_eq!(hw.last_telemetry(), Some("7510\n"));
    assert_eq!(sink.telemetry, 2);
}

#[test]
fn wizard_buttons_are_ignored_in_auto() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.press(&[ButtonEvent::Right, ButtonEvent::Up, ButtonEvent::Left]);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.ui_state(), ManualUiState::Normal);
    assert_eq!(app.window(), ScheduleWindow::default());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::WizardStep { .. })), 0);
}

#[test]
fn button_burst_is_bounded_per_tick() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.press(&[ButtonEvent::Up; 20]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.buttons.len(), 20 - MAX_BUTTON_EVENTS_PER_TICK);
}

// ── Manual mode ───────────────────────────────────────────────

#[test]
fn manual_window_wraps_past_midnight() {
    let window = ScheduleWindow::new(TimeOfDay::hm(22, 30), TimeOfDay::hm(1, 0)).unwrap();
    let (mut app, mut hw, mut sink) = manual_app(window);

    let mut seen = Vec::new();
    for (h, m) in [(22, 29), (22, 30), (23, 59), (0, 0), (0, 59), (1, 0), (12, 0)] {
        hw.time = TimeOfDay::hm(h, m);
        app.tick(&mut hw, &mut sink);
        seen.push(hw.relay());
    }
    assert_eq!(seen, vec![false, true, true, true, true, false, false]);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::PumpChanged {
            on: true,
            source: PumpSource::Schedule
        }
    )));
}

#[test]
fn manual_ignores_soil_moisture() {
    let (mut app, mut hw, mut sink) = manual_app(ScheduleWindow::default());
    hw.raw = Some(DRY);
    hw.time = TimeOfDay::hm(12, 0);
    app.tick(&mut hw, &mut sink);
    assert!(!hw.relay());
}

#[test]
fn wizard_edits_the_window() {
    let (mut app, mut hw, mut sink) = manual_app(ScheduleWindow::default());
    sink.clear();

    hw.press(&[
        ButtonEvent::Right, // start hour
        ButtonEvent::Up,    // 09:00, stop pushed to 09:01
        ButtonEvent::Right, // start minute
        ButtonEvent::Right, // stop hour
        ButtonEvent::Down,  // 08:01 is not after 09:00: refused
        ButtonEvent::Up,    // 10:01
        ButtonEvent::Right, // stop minute
    ]);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.ui_state(), ManualUiState::EditStopMinute);
    assert_eq!(app.window().start, TimeOfDay::hm(9, 0));
    assert_eq!(app.window().stop, TimeOfDay::hm(10, 1));
    assert!(sink.events.contains(&AppEvent::WindowChanged {
        window: ScheduleWindow::new(TimeOfDay::hm(9, 0), TimeOfDay::hm(9, 1)).unwrap(),
        stop_pushed: true,
    }));
    assert_eq!(
        sink.count(|e| *e == AppEvent::EditRejected(ManualUiState::EditStopHour)),
        1
    );

    hw.press(&[ButtonEvent::Right]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.ui_state(), ManualUiState::Normal);
}

#[test]
fn pump_decision_holds_while_editing() {
    let (mut app, mut hw, mut sink) = manual_app(ScheduleWindow::default());
    hw.time = TimeOfDay::hm(8, 30);
    app.tick(&mut hw, &mut sink);
    assert!(hw.relay());

    // Move the start to 10:00 (outside now) while still editing.
    hw.press(&[ButtonEvent::Right, ButtonEvent::Up, ButtonEvent::Up]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.ui_state(), ManualUiState::EditStartHour);
    assert!(hw.relay(), "held while the wizard is open");

    hw.press(&[ButtonEvent::Left]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.ui_state(), ManualUiState::Normal);
    assert!(!hw.relay());
}

#[test]
fn mode_press_abandons_the_wizard() {
    let (mut app, mut hw, mut sink) = manual_app(ScheduleWindow::default());
    hw.press(&[ButtonEvent::Right, ButtonEvent::Right, ButtonEvent::Mode]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.mode(), OperatingMode::Auto);
    assert_eq!(app.ui_state(), ManualUiState::Normal);
}

#[test]
fn display_follows_mode_and_wizard() {
    let (mut app, mut hw, mut sink) = manual_app(ScheduleWindow::default());
    hw.time = TimeOfDay::new(8, 15, 30);
    app.tick(&mut hw, &mut sink);
    let screen = hw.last_screen().unwrap();
    assert_eq!(screen.top.as_str(), "MANUAL 08:15:30");
    assert_eq!(screen.bottom.as_str(), "08:00-09:00 ON");

    hw.press(&[ButtonEvent::Right]);
    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.last_screen().unwrap().top.as_str(), "Set Start HH:MM");
}

// ── Host link ─────────────────────────────────────────────────

#[test]
fn time_sync_sets_the_clock() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.host_says("3:15:00 PM");
    app.tick(&mut hw, &mut sink);

    assert_eq!(hw.clock_sets, vec![TimeOfDay::new(15, 15, 0)]);
    assert_eq!(app.now(), TimeOfDay::new(15, 15, 0));
    assert!(sink.events.contains(&AppEvent::ClockSynced(TimeOfDay::new(15, 15, 0))));
    assert!(!app.override_active());
}

#[test]
fn override_latches_until_the_mode_output_changes() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(DRY);
    app.tick(&mut hw, &mut sink);
    assert!(hw.relay());

    hw.host_says("0");
    app.tick(&mut hw, &mut sink);
    assert!(!hw.relay());
    assert!(app.override_active());
    assert!(sink.events.contains(&AppEvent::PumpChanged {
        on: false,
        source: PumpSource::Host
    }));

    // Still dry: moisture keeps asking for water, the latch wins.
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
        assert!(!hw.relay());
    }

    // Wet: the moisture decision flips, which releases the latch.
    hw.raw = Some(WET);
    app.tick(&mut hw, &mut sink);
    assert!(!app.override_active());
    assert_eq!(sink.count(|e| *e == AppEvent::OverrideReleased), 1);

    // Dry again: moisture control is back in charge.
    hw.raw = Some(DRY);
    app.tick(&mut hw, &mut sink);
    assert!(hw.relay());
}

#[test]
fn combined_token_syncs_and_overrides() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.host_says("11:59:30 PM1");
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.now(), TimeOfDay::new(23, 59, 30));
    assert!(hw.relay());
    assert!(sink.events.contains(&AppEvent::HostOverride { on: true }));
}

#[test]
fn mode_toggle_releases_the_override() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.host_says("1");
    app.tick(&mut hw, &mut sink);
    assert!(app.override_active());

    hw.press(&[ButtonEvent::Mode]);
    app.tick(&mut hw, &mut sink);
    assert!(!app.override_active());
    // Manual at midnight, default window: off.
    assert!(!hw.relay());
}

#[test]
fn newest_override_in_a_line_wins() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.host_says("1\n0\n1");
    app.tick(&mut hw, &mut sink);
    assert!(hw.relay());
    assert_eq!(app.session().lines_processed(), 1);
}

#[test]
fn malformed_token_drops_the_pending_override() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(WET);
    hw.host_says("1\nwater now");
    app.tick(&mut hw, &mut sink);

    assert!(!hw.relay());
    assert!(!app.override_active());
    assert!(app.session().has_error());
    assert_eq!(sink.count(|e| *e == AppEvent::ProtocolError), 1);

    hw.host_says("9:00:00 AM");
    app.tick(&mut hw, &mut sink);
    assert!(!app.session().has_error());
}

#[test]
fn handle_command_accepts_a_host_line_directly() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::new();
    let mut line = irrigator::protocol::LineBuf::new();
    line.extend_from_slice(b"7:05:00 AM").unwrap();
    app.handle_command(AppCommand::HostLine(line), &mut hw, &mut sink);
    assert_eq!(hw.clock_sets, vec![TimeOfDay::new(7, 5, 0)]);
}

// ── Fault absorption ──────────────────────────────────────────

#[test]
fn relay_failure_is_retried_and_reported_on_recovery() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(DRY);
    hw.pump_fails = true;
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);

    assert!(!app.pump_on());
    assert!(app.health().pump);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PumpChanged { .. })), 0);

    hw.pump_fails = false;
    app.tick(&mut hw, &mut sink);
    assert!(app.pump_on());
    assert!(!app.health().is_degraded());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PumpChanged { on: true, .. })), 1);
}

#[test]
fn lost_sensor_holds_the_last_decision() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(DRY);
    app.tick(&mut hw, &mut sink);
    assert!(hw.relay());

    hw.raw = None;
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
        assert!(hw.relay());
    }
    assert!(app.health().moisture);
}

#[test]
fn telemetry_failure_does_not_stop_the_loop() {
    let (mut app, mut sink) = started(&SystemConfig::default());
    let mut hw = MockBoard::with_raw(DRY);
    hw.tx_fails = true;
    app.tick(&mut hw, &mut sink);

    assert!(hw.relay());
    assert!(hw.sent.is_empty());
    assert!(app.health().host_tx);
    assert_eq!(sink.telemetry, 1);
    assert_eq!(app.tick_count(), 1);
}
