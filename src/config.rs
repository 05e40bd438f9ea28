//! System configuration parameters
//!
//! All tunable parameters for the irrigator.  Values are compiled in; a
//! JSON override document can be baked into the image at build time via
//! the `IRRIGATOR_CONFIG` environment variable (see [`SystemConfig::from_json`]).
//! Nothing is persisted at runtime.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleWindow;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Soil moisture ---
    /// Full-scale raw ADC reading (bone dry).
    pub moisture_adc_max: u16,
    /// Number of raw samples averaged per reading.
    pub moisture_sample_count: u8,
    /// Auto mode: start watering below this percentage.
    pub moisture_low_percent: u8,
    /// Auto mode: stop watering at or above this percentage.
    pub moisture_high_percent: u8,

    // --- Manual mode ---
    /// Watering window loaded at boot.
    pub default_window: ScheduleWindow,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Minimum stable time before a button level change counts (milliseconds)
    pub button_debounce_ms: u32,

    // --- Host link ---
    /// UART baud rate for the supervisory host.
    pub uart_baud: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Soil moisture
            moisture_adc_max: 4095, // 12-bit ADC
            moisture_sample_count: 20,
            moisture_low_percent: 30,
            moisture_high_percent: 50,

            // Manual mode
            default_window: ScheduleWindow::default(), // 08:00–09:00

            // Timing
            control_loop_interval_ms: 100, // 10 Hz
            button_debounce_ms: 50,

            // Host link
            uart_baud: 115_200,
        }
    }
}

/// Why a configuration was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for [`SystemConfig`].
    Parse,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config document could not be parsed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SystemConfig {
    /// Check every field range.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moisture_adc_max == 0 {
            return Err(ConfigError::ValidationFailed("moisture_adc_max must be > 0"));
        }
        if self.moisture_sample_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "moisture_sample_count must be > 0",
            ));
        }
        if self.moisture_high_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "moisture_high_percent must be <= 100",
            ));
        }
        if self.moisture_low_percent >= self.moisture_high_percent {
            return Err(ConfigError::ValidationFailed(
                "moisture_low_percent must be below moisture_high_percent",
            ));
        }
        if !self.default_window.is_valid() {
            return Err(ConfigError::ValidationFailed(
                "default_window endpoints must be valid and distinct",
            ));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be > 0",
            ));
        }
        if self.uart_baud == 0 {
            return Err(ConfigError::ValidationFailed("uart_baud must be > 0"));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON override document.  Missing fields
    /// keep their defaults; the result is validated before it is returned.
    pub fn from_json(doc: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(doc).map_err(|e| {
            log::warn!("config override rejected: {}", e);
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration baked in through `IRRIGATOR_CONFIG` at build time, or
    /// the defaults when the variable is unset or its document is rejected.
    pub fn from_build_env() -> Self {
        Self::from_override(option_env!("IRRIGATOR_CONFIG"))
    }

    fn from_override(doc: Option<&str>) -> Self {
        let Some(doc) = doc else {
            return Self::default();
        };
        match Self::from_json(doc.as_bytes()) {
            Ok(config) => {
                log::info!("using baked-in config override");
                config
            }
            Err(e) => {
                log::warn!("baked-in config ignored ({}), using defaults", e);
                Self::default()
            }
        }
    }
}
