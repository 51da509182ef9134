//! Analog pressure transducer driver.
//!
//! Reads one ADC1 channel and reduces the raw 12-bit conversion to the
//! 10-bit sensor units the regulators work in.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from static atomics for injection, including a
//! fault flag that makes the next reads fail.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::error::SensorError;
use crate::fsm::context::ChannelId;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Largest raw value a 12-bit conversion can produce.
pub const ADC_MAX_RAW: u16 = 4095;
/// Raw-to-sensor-unit shift (12-bit → 10-bit).
pub const RAW_SHIFT: u32 = 2;

#[cfg(not(target_os = "espidf"))]
static SIM_RAW: [AtomicU16; ChannelId::COUNT] = [AtomicU16::new(0), AtomicU16::new(0)];
#[cfg(not(target_os = "espidf"))]
static SIM_FAULT: [AtomicBool; ChannelId::COUNT] = [AtomicBool::new(false), AtomicBool::new(false)];

/// Inject the raw 12-bit ADC value returned for `channel`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pressure(channel: ChannelId, raw: u16) {
    SIM_RAW[channel as usize].store(raw, Ordering::Relaxed);
}

/// Make reads on `channel` fail until cleared.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_fault(channel: ChannelId, failing: bool) {
    SIM_FAULT[channel as usize].store(failing, Ordering::Relaxed);
}

pub struct PressureSensor {
    channel: ChannelId,
    _adc_channel: u32,
}

impl PressureSensor {
    pub fn new(channel: ChannelId, adc_channel: u32) -> Self {
        Self {
            channel,
            _adc_channel: adc_channel,
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// One conversion in sensor units (0–1023).
    pub fn read(&mut self) -> crate::error::Result<u16> {
        let raw = self.read_adc()?;
        Ok(to_sensor_units(raw)?)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self._adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        let idx = self.channel as usize;
        if SIM_FAULT[idx].load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_RAW[idx].load(Ordering::Relaxed))
    }
}

/// 12-bit raw conversion to 10-bit sensor units.
pub fn to_sensor_units(raw: u16) -> Result<u16, SensorError> {
    if raw > ADC_MAX_RAW {
        return Err(SensorError::OutOfRange);
    }
    Ok(raw >> RAW_SHIFT)
}
