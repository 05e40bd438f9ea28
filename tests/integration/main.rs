//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock or fake adapters.  All tests run on the host with no
//! real hardware required.

#![cfg(not(target_os = "espidf"))]

mod controller_tests;
mod host_link_tests;
mod mock_hw;
