//! Operating mode and manual-mode wizard.
//!
//! Table-driven, like every state machine in this firmware:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌─────────────────┬─────────────────┬──────────┬───────────┐  │
//! │  │ ManualUiState   │ forward (Right) │ back     │ on_adjust │  │
//! │  ├─────────────────┼─────────────────┼──────────┼───────────┤  │
//! │  │ Normal          │ EditStartHour   │ —        │ —         │  │
//! │  │ EditStartHour   │ EditStartMinute │ Normal   │ fn(ctx,±) │  │
//! │  │ EditStartMinute │ EditStopHour    │ StartHr  │ fn(ctx,±) │  │
//! │  │ EditStopHour    │ EditStopMinute  │ StartMin │ fn(ctx,±) │  │
//! │  │ EditStopMinute  │ Normal          │ StopHr   │ fn(ctx,±) │  │
//! │  └─────────────────┴─────────────────┴──────────┴───────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Mode` toggles Auto ⇄ Manual from anywhere and always lands the wizard
//! on `Normal`.  In Auto every other button is ignored.  The machine is
//! total: every (state, event) pair has a defined result.

pub mod context;
pub mod states;

use core::fmt;

use context::UiContext;
use log::{debug, info};

use crate::schedule::ScheduleWindow;

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperatingMode {
    /// Pump follows soil moisture.
    Auto = 0,
    /// Pump follows the programmed daily window.
    Manual = 1,
}

impl OperatingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Auto => Self::Manual,
            Self::Manual => Self::Auto,
        }
    }

    pub fn is_manual(self) -> bool {
        self == Self::Manual
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Wizard state identity
// ---------------------------------------------------------------------------

/// Manual-mode sub-state.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ManualUiState {
    Normal = 0,
    EditStartHour = 1,
    EditStartMinute = 2,
    EditStopHour = 3,
    EditStopMinute = 4,
}

impl ManualUiState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to a state.  Out-of-range asserts in debug
    /// builds and falls back to `Normal` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Normal,
            1 => Self::EditStartHour,
            2 => Self::EditStartMinute,
            3 => Self::EditStopHour,
            4 => Self::EditStopMinute,
            _ => {
                debug_assert!(false, "invalid wizard index: {idx}");
                Self::Normal
            }
        }
    }

    /// Whether the operator is mid-edit.
    pub fn is_editing(self) -> bool {
        self != Self::Normal
    }
}

// ---------------------------------------------------------------------------
// Inputs and outcomes
// ---------------------------------------------------------------------------

/// One debounced button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    Mode,
    Up,
    Down,
    Left,
    Right,
}

/// Direction of a field adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Up,
    Down,
}

/// Result of one adjust handler call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// Start edit applied and the stop moved to one minute after it.
    StopPushed,
    /// Stop edit refused; window unchanged.
    Rejected,
}

/// Observable effect of handling one button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiChange {
    ModeChanged(OperatingMode),
    StepChanged {
        from: ManualUiState,
        to: ManualUiState,
    },
    WindowEdited {
        window: ScheduleWindow,
        stop_pushed: bool,
    },
    EditRejected {
        state: ManualUiState,
    },
}

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Signature for the Up/Down handler of an edit state.
pub type AdjustFn = fn(&mut UiContext, Adjust) -> EditOutcome;

/// Static descriptor for one wizard state.
pub struct StateDescriptor {
    pub id: ManualUiState,
    pub name: &'static str,
    /// Target of `Right`.
    pub forward: ManualUiState,
    /// Target of `Left`; `None` means the press is ignored.
    pub back: Option<ManualUiState>,
    /// Up/Down handler; `None` means the presses are ignored.
    pub on_adjust: Option<AdjustFn>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `ManualUiState as usize`.
    table: [StateDescriptor; ManualUiState::COUNT],
    current: usize,
}

impl Fsm {
    /// Construct with the given table, starting on `Normal`.
    pub fn new(table: [StateDescriptor; ManualUiState::COUNT]) -> Self {
        Self {
            table,
            current: ManualUiState::Normal as usize,
        }
    }

    pub fn current_state(&self) -> ManualUiState {
        ManualUiState::from_index(self.current)
    }

    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Feed one button event.  Returns what changed, if anything.
    pub fn handle(&mut self, event: ButtonEvent, ctx: &mut UiContext) -> Option<UiChange> {
        let adjust = match event {
            ButtonEvent::Mode => return Some(self.toggle_mode(ctx)),
            _ if ctx.mode == OperatingMode::Auto => {
                debug!("UI: {:?} ignored in AUTO", event);
                return None;
            }
            ButtonEvent::Right => return self.step_to(self.table[self.current].forward),
            ButtonEvent::Left => return self.table[self.current].back.and_then(|to| self.step_to(to)),
            ButtonEvent::Up => Adjust::Up,
            ButtonEvent::Down => Adjust::Down,
        };

        let row = &self.table[self.current];
        let on_adjust = row.on_adjust?;
        let state = row.id;

        match on_adjust(ctx, adjust) {
            EditOutcome::Rejected => {
                info!(
                    "UI: {} {:?} rejected, stop must stay after start {}",
                    row.name, adjust, ctx.window.start
                );
                Some(UiChange::EditRejected { state })
            }
            outcome => {
                let stop_pushed = outcome == EditOutcome::StopPushed;
                debug!(
                    "UI: window {}-{}{}",
                    ctx.window.start,
                    ctx.window.stop,
                    if stop_pushed { " (stop pushed)" } else { "" }
                );
                Some(UiChange::WindowEdited {
                    window: ctx.window,
                    stop_pushed,
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn toggle_mode(&mut self, ctx: &mut UiContext) -> UiChange {
        ctx.mode = ctx.mode.toggled();
        if self.current != ManualUiState::Normal as usize {
            info!("UI: {} abandoned", self.current_name());
            self.current = ManualUiState::Normal as usize;
        }
        info!("UI: mode -> {}", ctx.mode);
        UiChange::ModeChanged(ctx.mode)
    }

    fn step_to(&mut self, next: ManualUiState) -> Option<UiChange> {
        let from = self.current_state();
        if from == next {
            return None;
        }
        info!(
            "UI: {} -> {}",
            self.table[self.current].name,
            self.table[next as usize].name
        );
        self.current = next as usize;
        Some(UiChange::StepChanged { from, to: next })
    }
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new(states::build_state_table())
    }
}
