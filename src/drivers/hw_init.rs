//! One-shot hardware peripheral initialization.
//!
//! Configures the button GPIOs and the LEDC timers/channels using raw
//! ESP-IDF sys calls, and installs the button ISRs.  Called once from
//! `main()` before the input loop starts.

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

/// Full board bring-up: peripherals, then the button ISRs.
pub fn bring_up() -> crate::error::Result<()> {
    init_peripherals()?;
    init_isr_service()?;
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the input loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::PLUS_BUTTON_GPIO) | (1u64 << pins::MINUS_BUTTON_GPIO),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: button inputs configured");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_FAN: u32 = 0;
pub const LEDC_CH_STROBE: u32 = 1;
pub const LEDC_CH_LED_R: u32 = 2;
pub const LEDC_CH_LED_G: u32 = 3;
pub const LEDC_CH_LED_B: u32 = 4;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let check = |ret: esp_err_t| {
        if ret == ESP_OK as i32 {
            Ok(())
        } else {
            Err(HwInitError::LedcInitFailed(ret))
        }
    };

    // Timer 0: fan motor (25 kHz, 8-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::FAN_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer0) })?;

    // Timer 1: strobe + status LED (1 kHz, 8-bit)
    let timer1 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_1,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LIGHT_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer1) })?;

    let channels = [
        (LEDC_CH_FAN, ledc_timer_t_LEDC_TIMER_0, pins::FAN_PWM_GPIO),
        (LEDC_CH_STROBE, ledc_timer_t_LEDC_TIMER_1, pins::STROBE_PWM_GPIO),
        (LEDC_CH_LED_R, ledc_timer_t_LEDC_TIMER_1, pins::LED_R_GPIO),
        (LEDC_CH_LED_G, ledc_timer_t_LEDC_TIMER_1, pins::LED_G_GPIO),
        (LEDC_CH_LED_B, ledc_timer_t_LEDC_TIMER_1, pins::LED_B_GPIO),
    ];
    for (channel, timer, gpio) in channels {
        check(unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: timer,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        })?;
    }

    info!("hw_init: LEDC configured (fan=CH0, strobe=CH1, led=CH2-4)");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); every caller
    // holds the event lock, so duty writes never race.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
fn ledc_set(_channel: u32, _duty: u8) {}

/// One configured 8-bit LEDC channel, exposed as an `embedded-hal` PWM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcChannel {
    channel: u32,
    duty: u8,
}

impl LedcChannel {
    pub const fn new(channel: u32) -> Self {
        Self { channel, duty: 0 }
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }
}

impl ErrorType for LedcChannel {
    type Error = Infallible;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(u8::MAX)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty.min(u16::from(u8::MAX)) as u8;
        ledc_set(self.channel, self.duty);
        Ok(())
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::button::button_isr_handler;
use crate::events::Button;

/// Current level of a button pin.  The buttons are active low.
#[cfg(target_os = "espidf")]
pub fn button_pressed(button: Button) -> bool {
    let pin = match button {
        Button::Plus => pins::PLUS_BUTTON_GPIO,
        Button::Minus => pins::MINUS_BUTTON_GPIO,
    };
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    unsafe { gpio_get_level(pin) == 0 }
}

#[cfg(not(target_os = "espidf"))]
pub fn button_pressed(_button: Button) -> bool {
    false
}

#[cfg(target_os = "espidf")]
fn isr_now_ms() -> u32 {
    // SAFETY: esp_timer_get_time is a counter read; safe in ISR context.
    (unsafe { esp_timer_get_time() } / 1_000) as u32
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn plus_button_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler(Button::Plus, button_pressed(Button::Plus), isr_now_ms());
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn minus_button_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler(Button::Minus, button_pressed(Button::Minus), isr_now_ms());
}

/// Install per-pin GPIO ISR service and register the button handlers.
/// Call after init_peripherals() and before the input loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handlers only touch
    // atomics and the lock-free edge queue.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (pin, handler) in [
            (pins::PLUS_BUTTON_GPIO, plus_button_isr as unsafe extern "C" fn(*mut core::ffi::c_void)),
            (pins::MINUS_BUTTON_GPIO, minus_button_isr),
        ] {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            let ret = gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut());
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrInstallFailed(ret));
            }
            gpio_intr_enable(pin);
        }

        info!("hw_init: ISR service installed (plus, minus)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
