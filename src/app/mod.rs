//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the control rules for the irrigator: mode and
//! wizard orchestration, the pump decision, host override handling and
//! telemetry.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
