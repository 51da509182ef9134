//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod led_ring;
pub mod pneumatic;
