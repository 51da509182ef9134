//! One-shot hardware peripheral initialization.
//!
//! Configures ADC channels, LEDC timers/channels and the UART0 console
//! driver using raw ESP-IDF sys calls. Called once from `main()` before
//! the tick loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::error::SensorError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    LedcInitFailed(i32),
    UartInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)     => write!(f, "ADC1 init failed (rc={})", rc),
            Self::LedcInitFailed(rc)    => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::UartInstallFailed(rc) => write!(f, "UART0 driver install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> crate::error::Result<()> {
    // SAFETY: Called once from main() before the tick loop; single-threaded.
    unsafe {
        init_adc()?;
        init_ledc()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> crate::error::Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

pub const ADC1_CH_BASE_PRESSURE: u32 = 4;
pub const ADC1_CH_LEAVES_PRESSURE: u32 = 5;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_BASE_PRESSURE, ADC1_CH_LEAVES_PRESSURE] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH4=base, CH5=leaves)");
    Ok(())
}

/// Raw 12-bit oneshot conversion.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_BASE_PUMP: u32 = 0;
pub const LEDC_CH_BASE_VALVE: u32 = 1;
pub const LEDC_CH_LEAVES_PUMP: u32 = 2;
pub const LEDC_CH_LEAVES_VALVE: u32 = 3;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: pumps (25 kHz, 8-bit).  Timer 1: valves (1 kHz, 8-bit).
    let timers = [
        (ledc_timer_t_LEDC_TIMER_0, pins::PUMP_PWM_FREQ_HZ),
        (ledc_timer_t_LEDC_TIMER_1, pins::VALVE_PWM_FREQ_HZ),
    ];
    for (timer_num, freq_hz) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = unsafe { ledc_timer_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    let channels = [
        (LEDC_CH_BASE_PUMP, ledc_timer_t_LEDC_TIMER_0, pins::BASE_PUMP_PWM_GPIO),
        (LEDC_CH_BASE_VALVE, ledc_timer_t_LEDC_TIMER_1, pins::BASE_VALVE_PWM_GPIO),
        (LEDC_CH_LEAVES_PUMP, ledc_timer_t_LEDC_TIMER_0, pins::LEAVES_PUMP_PWM_GPIO),
        (LEDC_CH_LEAVES_VALVE, ledc_timer_t_LEDC_TIMER_1, pins::LEAVES_VALVE_PWM_GPIO),
    ];
    for (channel, timer_sel, gpio_num) in channels {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel,
            gpio_num,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    info!("hw_init: LEDC configured (base=CH0/CH1, leaves=CH2/CH3)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> bool {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        let set = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        let upd = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        set == ESP_OK as i32 && upd == ESP_OK as i32
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) -> bool {
    true
}

// ── UART0 console ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const UART0_RX_BUF: i32 = 256;

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), HwInitError> {
    // The console already configured the pins and baud rate; only the
    // RX ring buffer is needed for polled reads.
    let ret = unsafe {
        uart_driver_install(uart_port_t_UART_NUM_0 as _, UART0_RX_BUF, 0, 0, core::ptr::null_mut(), 0)
    };
    if ret != ESP_OK as i32 && ret != ESP_FAIL {
        return Err(HwInitError::UartInstallFailed(ret));
    }
    info!("hw_init: UART0 RX driver installed");
    Ok(())
}

/// Non-blocking read of pending console bytes.  Returns the count copied.
#[cfg(target_os = "espidf")]
pub fn uart0_read(buf: &mut [u8]) -> usize {
    // SAFETY: uart driver installed in init_uart(); zero tick timeout.
    let n = unsafe {
        uart_read_bytes(uart_port_t_UART_NUM_0 as _, buf.as_mut_ptr().cast(), buf.len() as u32, 0)
    };
    n.max(0) as usize
}
