//! WS2812 LED ring driver.
//!
//! Turns a [`VisualSignal`] into a full frame, applies the brightness cap
//! by scaling every channel, and transmits the frame only when it
//! changed since the last write.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: encodes the frame as GRB bit pulses on an RMT channel.
//! On host/test: keeps the frame in memory only.

use log::warn;

use crate::app::ports::LedPort;
use crate::error::ActuatorError;
use crate::fsm::behaviors::{Rgb, VisualSignal};
use crate::pins::LED_RING_PIXELS;

#[cfg(target_os = "espidf")]
use esp_idf_hal::rmt::{PinState, Pulse, TxRmtDriver, VariableLengthSignal};

pub type Frame = [Rgb; LED_RING_PIXELS];

const BLACK: Rgb = (0, 0, 0);

pub struct LedRing {
    cap: u8,
    frame: Frame,
    /// Frame last handed to the hardware; `None` forces a write.
    shown: Option<Frame>,
    failures: u32,
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
}

impl LedRing {
    #[cfg(target_os = "espidf")]
    pub fn new(brightness_cap: u8, tx: TxRmtDriver<'static>) -> Self {
        Self {
            cap: brightness_cap,
            frame: [BLACK; LED_RING_PIXELS],
            shown: None,
            failures: 0,
            tx,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(brightness_cap: u8) -> Self {
        Self {
            cap: brightness_cap,
            frame: [BLACK; LED_RING_PIXELS],
            shown: None,
            failures: 0,
        }
    }

    /// Frame after brightness scaling.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of frames that failed to transmit.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn clear(&mut self) {
        self.frame = [BLACK; LED_RING_PIXELS];
        self.flush();
    }

    fn flush(&mut self) {
        if self.shown == Some(self.frame) {
            return;
        }
        match self.transmit() {
            Ok(()) => self.shown = Some(self.frame),
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                self.shown = None;
                if self.failures == 1 || self.failures % 100 == 0 {
                    warn!("LED ring: {} ({} failures)", e, self.failures);
                }
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn transmit(&mut self) -> Result<(), ActuatorError> {
        use core::time::Duration;

        let ticks_hz = self.tx.counter_clock().map_err(|_| ActuatorError::LedWriteFailed)?;
        let pulse = |state, ns| {
            Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns))
                .map_err(|_| ActuatorError::LedWriteFailed)
        };
        let zero = [pulse(PinState::High, 350)?, pulse(PinState::Low, 800)?];
        let one = [pulse(PinState::High, 700)?, pulse(PinState::Low, 600)?];

        let mut signal = VariableLengthSignal::with_capacity(LED_RING_PIXELS * 24 * 2);
        for &(r, g, b) in &self.frame {
            let grb = (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b);
            for bit in (0..24).rev() {
                let pair = if grb & (1 << bit) != 0 { &one } else { &zero };
                signal.push(pair.iter()).map_err(|_| ActuatorError::LedWriteFailed)?;
            }
        }
        self.tx.start_blocking(&signal).map_err(|_| ActuatorError::LedWriteFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn transmit(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
}

impl LedPort for LedRing {
    fn render(&mut self, signal: &VisualSignal) {
        self.frame = compose(signal, self.cap);
        self.flush();
    }
}

/// Expand a signal into a frame, scaled by `min(brightness, cap)`.
pub fn compose(signal: &VisualSignal, cap: u8) -> Frame {
    let mut frame = [BLACK; LED_RING_PIXELS];
    match signal {
        VisualSignal::Fill { colour, brightness } => {
            let px = scale(*colour, (*brightness).min(cap));
            frame.fill(px);
        }
        VisualSignal::Pixels { pixels, brightness } => {
            let level = (*brightness).min(cap);
            for (slot, px) in frame.iter_mut().zip(pixels.iter()) {
                *slot = scale(*px, level);
            }
        }
    }
    frame
}

fn scale((r, g, b): Rgb, level: u8) -> Rgb {
    let s = |c: u8| ((u16::from(c) * u16::from(level)) / 255) as u8;
    (s(r), s(g), s(b))
}
