//! Soil moisture conversion and the auto-mode watering band.
//!
//! The capacitive probe reads *inverted*: a higher ADC value means drier
//! soil.  The converter maps an already-averaged raw sample onto 0–100 %
//! wet, and [`MoistureBand`] turns that percentage into a pump decision
//! with hysteresis so the relay does not chatter around one threshold.

use crate::config::SystemConfig;

/// Maps averaged raw ADC samples to a moisture percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureConverter {
    max: u16,
}

impl MoistureConverter {
    /// `max` is the full-scale ADC reading (4095 for a 12-bit converter).
    /// A zero full scale would divide by zero, so it is raised to 1.
    pub fn new(max: u16) -> Self {
        Self { max: max.max(1) }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.moisture_adc_max)
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Convert a raw sample to percent wet.  Any `raw >= max` is bone dry.
    pub fn convert(&self, raw: u16) -> u8 {
        if raw >= self.max {
            return 0;
        }
        let max = self.max as u32;
        (((max - raw as u32) * 100) / max) as u8
    }
}

/// Auto-mode hysteresis band.
///
/// ```text
///   0 %          low           high          100 %
///   ├── pump ON ──┤── hold ─────┤── pump OFF ──┤
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureBand {
    /// Below this the soil is too dry: start watering.
    pub low_percent: u8,
    /// At or above this the soil is wet enough: stop watering.
    pub high_percent: u8,
}

impl MoistureBand {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            low_percent: config.moisture_low_percent,
            high_percent: config.moisture_high_percent,
        }
    }

    /// Next pump decision given the current percentage and the previous
    /// decision.  Inside the band the previous decision is held.
    pub fn decide(&self, percent: u8, previous: bool) -> bool {
        if percent < self.low_percent {
            true
        } else if percent >= self.high_percent {
            false
        } else {
            previous
        }
    }
}
