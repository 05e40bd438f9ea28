//! Wizard state table and the field-adjust handlers.
//!
//! ```text
//!            Right            Right              Right             Right
//!  NORMAL ───────▶ START_HH ───────▶ START_MM ───────▶ STOP_HH ───────▶ STOP_MM
//!    ▲      ◀──────          ◀──────           ◀──────          ◀──────    │
//!    │       Left             Left              Left             Left      │
//!    └──────────────────────────── Right ──────────────────────────────────┘
//! ```
//!
//! Start-side edits always apply and push the stop forward if the window
//! would become empty or inverted.  Stop-side edits are refused unless the
//! stop stays strictly after the start.

use super::context::UiContext;
use super::{Adjust, EditOutcome, ManualUiState, StateDescriptor};
use crate::schedule::{MINUTES_PER_DAY, TimeOfDay};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the wizard table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; ManualUiState::COUNT] {
    [
        // Index 0 — Normal
        StateDescriptor {
            id: ManualUiState::Normal,
            name: "Normal",
            forward: ManualUiState::EditStartHour,
            back: None,
            on_adjust: None,
        },
        // Index 1 — EditStartHour
        StateDescriptor {
            id: ManualUiState::EditStartHour,
            name: "EditStartHour",
            forward: ManualUiState::EditStartMinute,
            back: Some(ManualUiState::Normal),
            on_adjust: Some(adjust_start_hour),
        },
        // Index 2 — EditStartMinute
        StateDescriptor {
            id: ManualUiState::EditStartMinute,
            name: "EditStartMinute",
            forward: ManualUiState::EditStopHour,
            back: Some(ManualUiState::EditStartHour),
            on_adjust: Some(adjust_start_minute),
        },
        // Index 3 — EditStopHour
        StateDescriptor {
            id: ManualUiState::EditStopHour,
            name: "EditStopHour",
            forward: ManualUiState::EditStopMinute,
            back: Some(ManualUiState::EditStartMinute),
            on_adjust: Some(adjust_stop_hour),
        },
        // Index 4 — EditStopMinute
        StateDescriptor {
            id: ManualUiState::EditStopMinute,
            name: "EditStopMinute",
            forward: ManualUiState::Normal,
            back: Some(ManualUiState::EditStopHour),
            on_adjust: Some(adjust_stop_minute),
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Field arithmetic
// ═══════════════════════════════════════════════════════════════════════════

/// Hour ± 1 modulo 24, minutes untouched.
fn step_hour(t: TimeOfDay, adj: Adjust) -> TimeOfDay {
    let h = match adj {
        Adjust::Up => (t.hours + 1) % 24,
        Adjust::Down => (t.hours + 23) % 24,
    };
    TimeOfDay::hm(h, t.minutes)
}

/// Minute ± 1, carrying into (or borrowing from) the hour.
fn step_minute(t: TimeOfDay, adj: Adjust) -> TimeOfDay {
    let m = t.minutes_since_midnight();
    let m = match adj {
        Adjust::Up => m + 1,
        Adjust::Down => m + MINUTES_PER_DAY - 1,
    };
    TimeOfDay::from_minutes(m)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Start side — always applied
// ═══════════════════════════════════════════════════════════════════════════

fn set_start(ctx: &mut UiContext, start: TimeOfDay) -> EditOutcome {
    ctx.window.start = start;
    if ctx.window.start_minutes() >= ctx.window.stop_minutes() {
        ctx.window.stop = start.next_minute();
        EditOutcome::StopPushed
    } else {
        EditOutcome::Applied
    }
}

fn adjust_start_hour(ctx: &mut UiContext, adj: Adjust) -> EditOutcome {
    set_start(ctx, step_hour(ctx.window.start, adj))
}

fn adjust_start_minute(ctx: &mut UiContext, adj: Adjust) -> EditOutcome {
    set_start(ctx, step_minute(ctx.window.start, adj))
}

// ═══════════════════════════════════════════════════════════════════════════
//  Stop side — validated
// ═══════════════════════════════════════════════════════════════════════════

fn set_stop(ctx: &mut UiContext, candidate: TimeOfDay) -> EditOutcome {
    if candidate.minutes_since_midnight() > ctx.window.start_minutes() {
        ctx.window.stop = candidate;
        EditOutcome::Applied
    } else {
        ctx.rejected_edits = ctx.rejected_edits.wrapping_add(1);
        EditOutcome::Rejected
    }
}

fn adjust_stop_hour(ctx: &mut UiContext, adj: Adjust) -> EditOutcome {
    set_stop(ctx, step_hour(ctx.window.stop, adj))
}

fn adjust_stop_minute(ctx: &mut UiContext, adj: Adjust) -> EditOutcome {
    set_stop(ctx, step_minute(ctx.window.stop, adj))
}
