//! Capacitive soil moisture probe.
//!
//! Takes a burst of raw ADC samples and returns their mean.  The probe
//! output is inverted (higher = drier); conversion to percent happens in
//! [`crate::moisture`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `main` implements [`RawAdc`] over the oneshot ADC channel.
//! On host/test: [`SimAdc`] reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::debug;

use crate::app::ports::MoisturePort;
use crate::error::{Result, SensorError};

/// One raw conversion from an ADC channel.
pub trait RawAdc {
    fn read_raw(&mut self) -> core::result::Result<u16, SensorError>;
}

#[cfg(not(target_os = "espidf"))]
static SIM_SOIL_ADC: AtomicU16 = AtomicU16::new(0);

/// Set the value every [`SimAdc`] read returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_soil_adc(raw: u16) {
    SIM_SOIL_ADC.store(raw, Ordering::Relaxed);
}

/// Simulated ADC channel backed by [`sim_set_soil_adc`].
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SimAdc;

#[cfg(not(target_os = "espidf"))]
impl RawAdc for SimAdc {
    fn read_raw(&mut self) -> core::result::Result<u16, SensorError> {
        Ok(SIM_SOIL_ADC.load(Ordering::Relaxed))
    }
}

pub struct SoilSensor<A> {
    adc: A,
    samples: u8,
    last_raw: Option<u16>,
}

impl<A: RawAdc> SoilSensor<A> {
    /// `samples` is clamped to at least one.
    pub fn new(adc: A, samples: u8) -> Self {
        Self {
            adc,
            samples: samples.max(1),
            last_raw: None,
        }
    }

    /// Most recent averaged reading.
    pub fn last_raw(&self) -> Option<u16> {
        self.last_raw
    }

    /// Mean of one burst.  Failed conversions are skipped; the read fails
    /// only if every conversion in the burst failed.
    pub fn read_mean(&mut self) -> core::result::Result<u16, SensorError> {
        let mut sum: u32 = 0;
        let mut good: u32 = 0;
        for _ in 0..self.samples {
            match self.adc.read_raw() {
                Ok(v) => {
                    sum += v as u32;
                    good += 1;
                }
                Err(e) => debug!("soil sample dropped: {e}"),
            }
        }
        if good == 0 {
            return Err(SensorError::NoSamples);
        }
        let mean = (sum / good) as u16;
        self.last_raw = Some(mean);
        Ok(mean)
    }
}

impl<A: RawAdc> MoisturePort for SoilSensor<A> {
    fn read_averaged(&mut self) -> Result<u16> {
        Ok(self.read_mean()?)
    }
}
