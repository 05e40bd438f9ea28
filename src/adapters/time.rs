//! Software real-time clock.
//!
//! The board has no battery-backed RTC, so wall-clock time is an offset
//! over a monotonic uptime counter.  The host sets the offset with a time
//! sync; until then the clock counts from midnight at boot.
//!
//! - **`target_os = "espidf"`** — uptime from `esp_timer_get_time()`
//!   (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.

use crate::app::ports::ClockPort;
use crate::error::{ClockError, Result};
use crate::schedule::TimeOfDay;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Monotonic milliseconds since some fixed point.
pub trait Uptime {
    fn uptime_ms(&self) -> u64;
}

/// Uptime from the platform's monotonic timer.
pub struct SystemUptime {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemUptime {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemUptime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Uptime for SystemUptime {
    #[cfg(target_os = "espidf")]
    fn uptime_ms(&self) -> u64 {
        // SAFETY: plain read of the high-resolution timer.
        (unsafe { esp_idf_sys::esp_timer_get_time() }) as u64 / 1000
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Hand-driven uptime for host simulation and tests.  Clones share the
/// same counter.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Default)]
pub struct SimUptime(std::sync::Arc<core::sync::atomic::AtomicU64>);

#[cfg(not(target_os = "espidf"))]
impl SimUptime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: u64) {
        self.0.store(ms, core::sync::atomic::Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.0.fetch_add(ms, core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
impl Uptime for SimUptime {
    fn uptime_ms(&self) -> u64 {
        self.0.load(core::sync::atomic::Ordering::Relaxed)
    }
}

/// Time of day kept as `base + (uptime - synced_at)`.
pub struct SoftClock<U = SystemUptime> {
    uptime: U,
    /// Seconds since midnight at the moment of the last sync.
    base_secs: u64,
    synced_at_ms: u64,
    synced: bool,
}

impl<U: Uptime> SoftClock<U> {
    /// Starts at midnight, unsynced.
    pub fn new(uptime: U) -> Self {
        let synced_at_ms = uptime.uptime_ms();
        Self {
            uptime,
            base_secs: 0,
            synced_at_ms,
            synced: false,
        }
    }

    pub fn uptime_ms(&self) -> u64 {
        self.uptime.uptime_ms()
    }

    /// Whether the host has set the time since boot.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    fn time_at(&self, now_ms: u64) -> TimeOfDay {
        let elapsed = now_ms.saturating_sub(self.synced_at_ms) / 1000;
        let secs = (self.base_secs + elapsed) % SECS_PER_DAY;
        TimeOfDay::new(
            (secs / 3600) as u8,
            ((secs / 60) % 60) as u8,
            (secs % 60) as u8,
        )
    }
}

impl<U: Uptime> ClockPort for SoftClock<U> {
    fn now(&mut self) -> Result<TimeOfDay> {
        Ok(self.time_at(self.uptime.uptime_ms()))
    }

    fn set_time(&mut self, time: TimeOfDay) -> Result<()> {
        if !time.is_valid() {
            return Err(ClockError::InvalidTime.into());
        }
        self.base_secs = time.hours as u64 * 3600 + time.minutes as u64 * 60 + time.seconds as u64;
        self.synced_at_ms = self.uptime.uptime_ms();
        self.synced = true;
        Ok(())
    }
}
