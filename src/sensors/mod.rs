//! Sensor subsystem: pressure drivers and the aggregating [`SensorHub`].
//!
//! The hub owns one [`PressureSensor`] per channel and produces a
//! [`PressureSnapshot`] each tick.

pub mod pressure;

use log::warn;

use crate::drivers::hw_init;
use crate::fsm::context::{ChannelId, PressureSnapshot};
use pressure::PressureSensor;

/// Aggregates both pressure sensors.
pub struct SensorHub {
    sensors: [PressureSensor; ChannelId::COUNT],
    last_good: PressureSnapshot,
    failures: [u32; ChannelId::COUNT],
}

impl Default for SensorHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorHub {
    pub fn new() -> Self {
        Self {
            sensors: [
                PressureSensor::new(ChannelId::Base, hw_init::ADC1_CH_BASE_PRESSURE),
                PressureSensor::new(ChannelId::Leaves, hw_init::ADC1_CH_LEAVES_PRESSURE),
            ],
            last_good: PressureSnapshot::default(),
            failures: [0; ChannelId::COUNT],
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Individual read failures are logged and the previous good value is
    /// retained for that channel.
    pub fn read_all(&mut self) -> PressureSnapshot {
        for sensor in &mut self.sensors {
            let idx = sensor.channel() as usize;
            match sensor.read() {
                Ok(value) => {
                    self.failures[idx] = 0;
                    match sensor.channel() {
                        ChannelId::Base => self.last_good.base = value,
                        ChannelId::Leaves => self.last_good.leaves = value,
                    }
                }
                Err(e) => {
                    self.failures[idx] = self.failures[idx].saturating_add(1);
                    if self.failures[idx] == 1 {
                        warn!("{} pressure: {}, holding last reading", sensor.channel().name(), e);
                    }
                }
            }
        }
        self.last_good
    }

    /// Consecutive failed reads on `channel`.
    pub fn consecutive_failures(&self, channel: ChannelId) -> u32 {
        self.failures[channel as usize]
    }
}
