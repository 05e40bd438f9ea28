//! Pump relay driver.
//!
//! On/off control of the pump through a relay module on one GPIO.  Most
//! cheap relay boards are active-low, so the polarity is configurable.
//!
//! The driver is a dumb actuator: the coordinator decides, this writes.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Drive the pin high to energise the relay.
    ActiveHigh,
    /// Drive the pin low to energise the relay.
    ActiveLow,
}

pub struct RelayPump<P> {
    pin: P,
    polarity: Polarity,
    on: bool,
}

impl<P: OutputPin> RelayPump<P> {
    /// Takes ownership of the pin and drives the relay off.
    pub fn new(pin: P, polarity: Polarity) -> Result<Self, ActuatorError> {
        let mut pump = Self {
            pin,
            polarity,
            on: false,
        };
        pump.write(false)?;
        Ok(pump)
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.write(on)?;
        self.on = on;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    /// State as last successfully written.
    pub fn is_running(&self) -> bool {
        self.on
    }

    fn write(&mut self, on: bool) -> Result<(), ActuatorError> {
        let high = match self.polarity {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        };
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)
    }
}
