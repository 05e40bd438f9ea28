//! Mutable state threaded through every UI handler.
//!
//! `UiContext` holds what the wizard edits and what the coordinator reads
//! back each tick: the operating mode and the programmed window.  The
//! wizard position itself lives in [`Fsm`](super::Fsm).

use super::OperatingMode;
use crate::schedule::ScheduleWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub mode: OperatingMode,
    /// Always satisfies `start != stop` (minutes since midnight).
    pub window: ScheduleWindow,
    /// Stop-side edits refused because they would not end after the start.
    pub rejected_edits: u32,
}

impl UiContext {
    /// Boot state: Auto mode with the given window.
    pub fn new(window: ScheduleWindow) -> Self {
        Self {
            mode: OperatingMode::Auto,
            window,
            rejected_edits: 0,
        }
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new(ScheduleWindow::default())
    }
}
