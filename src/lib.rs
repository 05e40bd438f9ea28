//! Irrigator firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod moisture;
pub mod pins;
pub mod protocol;
pub mod schedule;

pub mod adapters;
pub mod drivers;
pub mod sensors;
