//! One-shot hardware peripheral initialization.
//!
//! Configures the gas-sensor ADC channel and the LEDC timer/channel that
//! drives the buzzer, using raw ESP-IDF sys calls. Called once from
//! `main()` before the control loop starts. The indicator LEDs are plain
//! GPIO outputs owned by `PinDriver`s and are not touched here.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    LedcInitFailed(i32),
    TimerInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::TimerInitFailed(rc) => write!(f, "esp_timer create failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

pub const ADC1_CH_GAS: u32 = 6;
pub const LEDC_CH_BUZZER: u32 = 0;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_ledc()?;
        init_beep_timer()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
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
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_GAS, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=gas, GPIO{})", ADC1_CH_GAS, pins::GAS_ADC_GPIO);
    Ok(())
}

/// One oneshot conversion. `None` when the driver reports an error.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw.max(0) as u16)
}

// ── LEDC (buzzer square wave) ─────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: 2000,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: LEDC_CH_BUZZER,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::BUZZER_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!("hw_init: LEDC configured (buzzer=CH{}, GPIO{})", LEDC_CH_BUZZER, pins::BUZZER_GPIO);
    Ok(())
}

/// Start a 50 % square wave at `freq_hz` on the buzzer channel.
#[cfg(target_os = "espidf")]
pub fn buzzer_tone(freq_hz: u32) {
    // SAFETY: LEDC timer/channel were configured in init_ledc(); only the
    // main loop and the beep timer callback write the duty register, and
    // the callback only ever silences.
    unsafe {
        ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_timer_t_LEDC_TIMER_0, freq_hz);
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER, 128);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER);
    }
}

#[cfg(target_os = "espidf")]
pub fn buzzer_silence() {
    // SAFETY: see buzzer_tone().
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER, 0);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER);
    }
}

// ── One-shot beep timer ───────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut BEEP_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn beep_timer_expired(_arg: *mut core::ffi::c_void) {
    buzzer_silence();
}

#[cfg(target_os = "espidf")]
unsafe fn init_beep_timer() -> Result<(), HwInitError> {
    let args = esp_timer_create_args_t {
        callback: Some(beep_timer_expired),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"beep".as_ptr(),
        skip_unhandled_events: true,
    };
    // SAFETY: BEEP_TIMER is only written here, once at boot.
    let ret = unsafe { esp_timer_create(&args, &raw mut BEEP_TIMER) };
    if ret != ESP_OK {
        return Err(HwInitError::TimerInitFailed(ret));
    }
    Ok(())
}

/// Disarm a pending beep so its expiry does not silence a tone started since.
#[cfg(target_os = "espidf")]
pub fn buzzer_cancel_beep() {
    // SAFETY: BEEP_TIMER was created in init_beep_timer(); stop() on an
    // idle timer returns ESP_ERR_INVALID_STATE which is harmless.
    unsafe {
        esp_timer_stop(BEEP_TIMER);
    }
}

/// Sound the buzzer for `duration_ms`; the esp_timer callback silences it.
/// Returns immediately.
#[cfg(target_os = "espidf")]
pub fn buzzer_beep(freq_hz: u32, duration_ms: u32) {
    buzzer_tone(freq_hz);
    // SAFETY: BEEP_TIMER was created in init_beep_timer(); stop() on an
    // idle timer returns ESP_ERR_INVALID_STATE which is harmless.
    unsafe {
        esp_timer_stop(BEEP_TIMER);
        esp_timer_start_once(BEEP_TIMER, u64::from(duration_ms) * 1000);
    }
}
