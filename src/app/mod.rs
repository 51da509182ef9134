//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the runtime rules for the flower: the tick
//! driver, behavior orchestration, operator commands and the outbound
//! event model.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod clock;
pub mod commands;
pub mod events;
pub mod orchestrator;
pub mod ports;
pub mod service;
