//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and both pneumatic channel drivers, exposing
//! them through [`SensorPort`] and [`ActuatorPort`].  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.
//!
//! Driver errors stop here: they are logged (rate-limited) and the next
//! tick recomputes every command from fresh readings.

use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::regulator::Actuation;
use crate::drivers::pneumatic::LedcChannel;
use crate::fsm::context::{ChannelId, PressureSnapshot};
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    base: LedcChannel,
    leaves: LedcChannel,
    actuator_failures: u32,
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new(SensorHub::new(), LedcChannel::base(), LedcChannel::leaves())
    }
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, base: LedcChannel, leaves: LedcChannel) -> Self {
        Self {
            sensor_hub,
            base,
            leaves,
            actuator_failures: 0,
        }
    }

    fn channel_mut(&mut self, channel: ChannelId) -> &mut LedcChannel {
        match channel {
            ChannelId::Base => &mut self.base,
            ChannelId::Leaves => &mut self.leaves,
        }
    }

    /// Current `(pump, valve)` duties on `channel`.
    pub fn duties(&self, channel: ChannelId) -> (u8, u8) {
        match channel {
            ChannelId::Base => self.base.duties(),
            ChannelId::Leaves => self.leaves.duties(),
        }
    }

    pub fn actuator_failures(&self) -> u32 {
        self.actuator_failures
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_pressures(&mut self) -> PressureSnapshot {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn actuate(&mut self, channel: ChannelId, actuation: Actuation) {
        if let Err(e) = self.channel_mut(channel).apply(actuation) {
            self.actuator_failures = self.actuator_failures.saturating_add(1);
            if self.actuator_failures == 1 || self.actuator_failures % 100 == 0 {
                warn!(
                    "{} channel: {} ({} failures)",
                    channel.name(),
                    e,
                    self.actuator_failures
                );
            }
        }
    }

    fn all_off(&mut self) {
        for channel in ChannelId::ALL {
            self.actuate(channel, Actuation::Hold);
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn actuation_reaches_the_right_channel() {
        let mut hw = HardwareAdapter::default();
        hw.actuate(ChannelId::Leaves, Actuation::Vent(210));
        assert_eq!(hw.duties(ChannelId::Leaves), (0, 210));
        assert_eq!(hw.duties(ChannelId::Base), (0, 0));

        hw.actuate(ChannelId::Leaves, Actuation::Inflate(90));
        assert_eq!(hw.duties(ChannelId::Leaves), (90, 0));

        hw.all_off();
        assert_eq!(hw.duties(ChannelId::Leaves), (0, 0));
        assert_eq!(hw.actuator_failures(), 0);
    }
}
