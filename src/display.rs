//! Two-line status display content.
//!
//! ```text
//!   AUTO                 MANUAL (normal)      editing start hour
//!  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐
//!  │AUTO 14:05:09   │   │MANUAL 14:05:09 │   │Set Start HH:MM │
//!  │Moist: 42% P:ON │   │08:00-09:00 OFF │   │>08_:00 S:09:00 │
//!  └────────────────┘   └────────────────┘   └────────────────┘
//! ```
//!
//! The cursor marker (`>` / `_` for hours, `<` for minutes) shows which
//! field Up/Down will change.  Rendering is pure; the adapter decides how
//! the lines reach the glass.

use core::fmt::Write;

use crate::fsm::{ManualUiState, OperatingMode};
use crate::schedule::{ScheduleWindow, TimeOfDay};

/// Character cells per display row.
pub const LCD_COLUMNS: usize = 16;

pub type LcdLine = heapless::String<LCD_COLUMNS>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLines {
    pub top: LcdLine,
    pub bottom: LcdLine,
}

/// Everything the display shows, captured once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    pub mode: OperatingMode,
    pub ui_state: ManualUiState,
    pub now: TimeOfDay,
    pub window: ScheduleWindow,
    pub moisture_percent: u8,
    pub pump_on: bool,
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Lay out the two status lines.
pub fn render(view: &StatusView) -> StatusLines {
    let mut lines = StatusLines::default();
    let (top, bottom) = (&mut lines.top, &mut lines.bottom);
    let now = view.now;
    let (s, e) = (view.window.start, view.window.stop);

    // Every layout fits 16 cells, so the writes below cannot overflow.
    let _ = match (view.mode, view.ui_state) {
        (OperatingMode::Auto, _) => {
            let _ = write!(top, "AUTO {now}");
            write!(
                bottom,
                "Moist:{:3}% P:{}",
                view.moisture_percent,
                on_off(view.pump_on)
            )
        }
        (OperatingMode::Manual, ManualUiState::Normal) => {
            let _ = write!(top, "MANUAL {now}");
            write!(
                bottom,
                "{:02}:{:02}-{:02}:{:02} {}",
                s.hours,
                s.minutes,
                e.hours,
                e.minutes,
                on_off(view.pump_on)
            )
        }
        (OperatingMode::Manual, ManualUiState::EditStartHour) => {
            let _ = top.push_str("Set Start HH:MM");
            write!(
                bottom,
                ">{:02}_:{:02} S:{:02}:{:02}",
                s.hours, s.minutes, e.hours, e.minutes
            )
        }
        (OperatingMode::Manual, ManualUiState::EditStartMinute) => {
            let _ = top.push_str("Set Start HH:MM");
            write!(
                bottom,
                " {:02}:{:02}< S:{:02}:{:02}",
                s.hours, s.minutes, e.hours, e.minutes
            )
        }
        (OperatingMode::Manual, ManualUiState::EditStopHour) => {
            let _ = top.push_str("Set Stop HH:MM");
            write!(
                bottom,
                "S:{:02}:{:02} >{:02}_:{:02}",
                s.hours, s.minutes, e.hours, e.minutes
            )
        }
        (OperatingMode::Manual, ManualUiState::EditStopMinute) => {
            let _ = top.push_str("Set Stop HH:MM");
            write!(
                bottom,
                "S:{:02}:{:02}  {:02}:{:02}<",
                s.hours, s.minutes, e.hours, e.minutes
            )
        }
    };

    lines
}
