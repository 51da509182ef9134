//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to              |
//! |-----------------|--------------------|--------------------------|
//! | `hardware`      | SensorPort         | ESP32 ADC1               |
//! |                 | ActuatorPort       | ESP32 LEDC PWM           |
//! | `log_sink`      | EventSink          | Serial log output        |
//! | `config_source` | ConfigPort         | JSON compiled into image |
//! | `time`          | ClockPort          | ESP32 system timer       |
//! | `rng`           | UniformSource      | ChaCha8 seeded PRNG      |
//! | `console`       | (command source)   | UART0 RX                 |
//!
//! The LED ring implements `LedPort` directly in
//! [`drivers::led_ring`](crate::drivers::led_ring).

pub mod config_source;
pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod rng;
pub mod time;
