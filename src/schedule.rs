//! Daily watering window evaluation.
//!
//! Everything here works in *minutes since midnight* (0–1439).  A window
//! whose stop is numerically earlier than its start spans midnight:
//!
//! ```text
//!   same day   start ≤ stop      ──────[start ████████ stop)──────
//!   overnight  start > stop      ████ stop)──────────────[start ████
//!              0                                               1439
//! ```
//!
//! Start is inclusive, stop is exclusive, in both shapes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day as reported by the RTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Hour and minute only, seconds zero.  Window endpoints use this form.
    pub const fn hm(hours: u8, minutes: u8) -> Self {
        Self::new(hours, minutes, 0)
    }

    /// Build a time, rejecting out-of-range fields.
    pub fn checked(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        let t = Self::new(hours, minutes, seconds);
        t.is_valid().then_some(t)
    }

    pub fn is_valid(&self) -> bool {
        self.hours < 24 && self.minutes < 60 && self.seconds < 60
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.hours as u16 * 60 + self.minutes as u16
    }

    /// Inverse of [`minutes_since_midnight`](Self::minutes_since_midnight),
    /// wrapping past midnight.  Seconds are zero.
    pub fn from_minutes(minutes: u16) -> Self {
        let m = minutes % MINUTES_PER_DAY;
        Self::hm((m / 60) as u8, (m % 60) as u8)
    }

    /// One minute later, wrapping 23:59 → 00:00.
    pub fn next_minute(&self) -> Self {
        Self::from_minutes(self.minutes_since_midnight() + 1)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Decide whether the pump should run at `now` for the window
/// `[start, stop)`, all in minutes since midnight.
///
/// `start == stop` is an empty window and never runs.
pub fn should_run(now: u16, start: u16, stop: u16) -> bool {
    if start <= stop {
        now >= start && now < stop
    } else {
        now >= start || now < stop
    }
}

/// The operator-programmed daily watering window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: TimeOfDay,
    pub stop: TimeOfDay,
}

impl ScheduleWindow {
    /// Build a window.  `None` if the endpoints fall on the same minute or
    /// either is out of range.
    pub fn new(start: TimeOfDay, stop: TimeOfDay) -> Option<Self> {
        let w = Self { start, stop };
        w.is_valid().then_some(w)
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_valid()
            && self.stop.is_valid()
            && self.start.minutes_since_midnight() != self.stop.minutes_since_midnight()
    }

    pub fn start_minutes(&self) -> u16 {
        self.start.minutes_since_midnight()
    }

    pub fn stop_minutes(&self) -> u16 {
        self.stop.minutes_since_midnight()
    }

    /// Whether the window spans midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.start_minutes() > self.stop_minutes()
    }

    /// Length of the window in minutes.
    pub fn duration_minutes(&self) -> u16 {
        (self.stop_minutes() + MINUTES_PER_DAY - self.start_minutes()) % MINUTES_PER_DAY
    }

    /// Whether the pump should be running at `now`.
    pub fn is_active(&self, now: TimeOfDay) -> bool {
        should_run(
            now.minutes_since_midnight(),
            self.start_minutes(),
            self.stop_minutes(),
        )
    }
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self {
            start: TimeOfDay::hm(8, 0),
            stop: TimeOfDay::hm(9, 0),
        }
    }
}
