//! Pump/valve pair driver for one pressure channel.
//!
//! Each actuator is an `embedded_hal::pwm::SetDutyCycle`, so the channel
//! logic is independent of the LEDC peripheral and can be exercised with
//! recording fakes.
//!
//! ## Break-before-make
//!
//! The opposing actuator is always written to 0 before the requested one
//! is driven, so pump and valve are never commanded on together even
//! for the duration of one register write.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`LedcPwm`] writes the LEDC duty register via hw_init.
//! On host/test: it only records the last duty.

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

use crate::control::regulator::Actuation;
use crate::drivers::hw_init;
use crate::error::ActuatorError;

impl embedded_hal::pwm::Error for ActuatorError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// ── LEDC-backed PWM output ────────────────────────────────────

/// One 8-bit LEDC channel.
pub struct LedcPwm {
    channel: u32,
    duty: u8,
}

impl LedcPwm {
    pub fn new(channel: u32) -> Self {
        Self { channel, duty: 0 }
    }

    /// Last duty successfully written.
    pub fn duty(&self) -> u8 {
        self.duty
    }
}

impl ErrorType for LedcPwm {
    type Error = ActuatorError;
}

impl SetDutyCycle for LedcPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(u8::MAX)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(self.max_duty_cycle()) as u8;
        if !hw_init::ledc_set(self.channel, duty) {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.duty = duty;
        Ok(())
    }
}

// ── Channel driver ────────────────────────────────────────────

pub struct PneumaticChannel<P, V> {
    pump: P,
    valve: V,
    applied: Actuation,
}

impl<P: SetDutyCycle, V: SetDutyCycle> PneumaticChannel<P, V> {
    pub fn new(pump: P, valve: V) -> Self {
        Self {
            pump,
            valve,
            applied: Actuation::Hold,
        }
    }

    /// Drive the pair to `actuation`, opposing side first.
    pub fn apply(&mut self, actuation: Actuation) -> crate::error::Result<()> {
        match actuation {
            Actuation::Inflate(duty) => {
                set(&mut self.valve, 0)?;
                set(&mut self.pump, duty)?;
            }
            Actuation::Vent(duty) => {
                set(&mut self.pump, 0)?;
                set(&mut self.valve, duty)?;
            }
            Actuation::Hold => {
                set(&mut self.pump, 0)?;
                set(&mut self.valve, 0)?;
            }
        }
        self.applied = actuation;
        Ok(())
    }

    /// Both outputs to 0.
    pub fn off(&mut self) -> crate::error::Result<()> {
        self.apply(Actuation::Hold)
    }

    /// Last actuation that was fully applied.
    pub fn applied(&self) -> Actuation {
        self.applied
    }
}

fn set(pwm: &mut impl SetDutyCycle, duty: u8) -> crate::error::Result<()> {
    pwm.set_duty_cycle_fraction(u16::from(duty), u16::from(u8::MAX))
        .map_err(|_| ActuatorError::PwmWriteFailed.into())
}

/// Pump/valve pair on LEDC outputs.
pub type LedcChannel = PneumaticChannel<LedcPwm, LedcPwm>;

impl LedcChannel {
    pub fn base() -> Self {
        Self::new(
            LedcPwm::new(hw_init::LEDC_CH_BASE_PUMP),
            LedcPwm::new(hw_init::LEDC_CH_BASE_VALVE),
        )
    }

    pub fn leaves() -> Self {
        Self::new(
            LedcPwm::new(hw_init::LEDC_CH_LEAVES_PUMP),
            LedcPwm::new(hw_init::LEDC_CH_LEAVES_VALVE),
        )
    }

    /// Current `(pump, valve)` duties.
    pub fn duties(&self) -> (u8, u8) {
        (self.pump.duty(), self.valve.duty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(&'static str, u16)>>>;

    struct Recording {
        name: &'static str,
        log: Log,
        fail: bool,
    }

    impl ErrorType for Recording {
        type Error = ActuatorError;
    }

    impl SetDutyCycle for Recording {
        fn max_duty_cycle(&self) -> u16 {
            255
        }
        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), ActuatorError> {
            if self.fail {
                return Err(ActuatorError::PwmWriteFailed);
            }
            self.log.borrow_mut().push((self.name, duty));
            Ok(())
        }
    }

    fn channel(fail_pump: bool) -> (PneumaticChannel<Recording, Recording>, Log) {
        let log = Log::default();
        let pump = Recording { name: "pump", log: log.clone(), fail: fail_pump };
        let valve = Recording { name: "valve", log: log.clone(), fail: false };
        (PneumaticChannel::new(pump, valve), log)
    }

    #[test]
    fn inflate_closes_valve_first() {
        let (mut ch, log) = channel(false);
        ch.apply(Actuation::Inflate(143)).unwrap();
        assert_eq!(*log.borrow(), vec![("valve", 0), ("pump", 143)]);
    }

    #[test]
    fn vent_stops_pump_first() {
        let (mut ch, log) = channel(false);
        ch.apply(Actuation::Vent(232)).unwrap();
        assert_eq!(*log.borrow(), vec![("pump", 0), ("valve", 232)]);
        assert_eq!(ch.applied(), Actuation::Vent(232));
    }

    #[test]
    fn write_failure_is_reported() {
        let (mut ch, _) = channel(true);
        let err = ch.apply(Actuation::Inflate(10)).unwrap_err();
        assert_eq!(err, crate::error::Error::Actuator(ActuatorError::PwmWriteFailed));
        assert_eq!(ch.applied(), Actuation::Hold);
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn ledc_channel_tracks_duties() {
        let mut ch = LedcChannel::base();
        ch.apply(Actuation::Inflate(200)).unwrap();
        assert_eq!(ch.duties(), (200, 0));
        ch.off().unwrap();
        assert_eq!(ch.duties(), (0, 0));
    }
}
