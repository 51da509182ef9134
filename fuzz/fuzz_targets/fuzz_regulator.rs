//! Fuzz target: `PressureRegulator`
//!
//! Feeds arbitrary (level, reading) pairs through both default channel
//! regulators and verifies:
//! - No panics for any f32 level, including NaN and infinities
//! - Pump and valve are never commanded together
//! - No command exceeds the channel's `max_pwm`
//!
//! cargo fuzz run fuzz_regulator

#![no_main]

use libfuzzer_sys::fuzz_target;
use softbloom::config::SystemConfig;
use softbloom::control::regulator::PressureRegulator;

fuzz_target!(|data: &[u8]| {
    let cfg = SystemConfig::default();
    let mut regulators = [PressureRegulator::new(cfg.base), PressureRegulator::new(cfg.leaves)];

    for (i, chunk) in data.chunks_exact(6).enumerate() {
        let level = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let reading = u16::from_le_bytes([chunk[4], chunk[5]]);
        let reg = &mut regulators[i % 2];

        let (pump, valve) = reg.regulate(level, reading).duties();
        assert!(pump == 0 || valve == 0, "pump and valve both on");
        assert!(pump.max(valve) <= reg.config().max_pwm);
        assert_eq!(reg.state().valve_open, valve > 0);
    }
});
