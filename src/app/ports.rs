//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, LED ring, event sinks, clock,
//! randomness, config) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the control core never touches hardware directly.
//!
//! Sensor and actuator ports are infallible at this layer: hardware
//! faults are logged by the adapter and the next tick recomputes
//! everything from fresh readings.

use crate::config::SystemConfig;
use crate::control::regulator::Actuation;
use crate::fsm::behaviors::VisualSignal;
use crate::fsm::context::{ChannelId, PressureSnapshot};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one fresh reading per channel, once per tick.
pub trait SensorPort {
    fn read_pressures(&mut self) -> PressureSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the pump/valve pairs.
pub trait ActuatorPort {
    /// Drive one channel.  `Actuation` guarantees pump and valve are
    /// never both on.
    fn actuate(&mut self, channel: ChannelId, actuation: Actuation);

    /// Pumps and valves off on both channels.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// LED port (driven adapter: domain → LED ring)
// ───────────────────────────────────────────────────────────────

/// Renders a uniform fill or a per-pixel frame.  Called at most once per tick.
pub trait LedPort {
    fn render(&mut self, signal: &VisualSignal);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Raw monotonic millisecond counter.  May wrap at `u32::MAX`; the
/// [`TickClock`](super::clock::TickClock) widens it.
pub trait ClockPort {
    fn now_ms(&mut self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Uniform random source
// ───────────────────────────────────────────────────────────────

/// Source of uniform draws in `[0, 1)` for the mode machine.
pub trait UniformSource {
    fn next_unit(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads the tunables once at boot.
pub trait ConfigPort {
    /// Load and validate configuration.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The stored document could not be deserialized.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
