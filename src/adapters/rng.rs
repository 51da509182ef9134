//! Seedable uniform random source.
//!
//! Wraps a [`ChaCha8Rng`] behind [`UniformSource`].  A fixed seed from
//! configuration makes every mode sequence reproducible; otherwise the
//! seed comes from the hardware RNG (device) or the wall clock (host).

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::app::ports::UniformSource;

pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Use `seed` when given, else ask the platform for one.
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => {
                info!("RNG: fixed seed {:#018x}", s);
                Self::from_seed(s)
            }
            None => Self::from_seed(platform_seed()),
        }
    }
}

impl UniformSource for ChaChaSource {
    fn next_unit(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }
}

#[cfg(target_os = "espidf")]
fn platform_seed() -> u64 {
    // SAFETY: esp_random reads the hardware RNG register.
    let (hi, lo) = unsafe { (esp_idf_svc::sys::esp_random(), esp_idf_svc::sys::esp_random()) };
    (u64::from(hi) << 32) | u64::from(lo)
}

#[cfg(not(target_os = "espidf"))]
fn platform_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
