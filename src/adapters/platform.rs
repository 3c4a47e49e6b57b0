//! Platform power control: the pieces of the power-off sequence that
//! touch the scheduler, the interrupt controller and the sleep controller.
//!
//! - [`EspPlatform`] on ESP-IDF: FreeRTOS suspend, an ISR critical section
//!   that is never left, ext1 wake on the button pins and deep sleep.
//! - [`SimPlatform`] on host: records what was asked so tests can assert
//!   the sequence reached the halt.
//!
//! Nothing here may log once `mask_interrupts` has run.

use crate::app::ports::PlatformPort;

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspPlatform;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::interrupt::IsrCriticalSection;
    use esp_idf_svc::sys::*;

    use crate::app::ports::PlatformPort;
    use crate::pins;

    static SHUTDOWN_CS: IsrCriticalSection = IsrCriticalSection::new();

    /// Real power control for the ESP32-S3.
    #[derive(Default)]
    pub struct EspPlatform;

    impl EspPlatform {
        pub fn new() -> Self {
            Self
        }
    }

    impl PlatformPort for EspPlatform {
        fn suspend_scheduling(&mut self) {
            // SAFETY: suspends the scheduler for the rest of this boot; the
            // calling task keeps running until the halt.
            unsafe { vTaskSuspendAll() };
        }

        fn mask_interrupts(&mut self) {
            // The guard is leaked: interrupts stay masked until the halt.
            core::mem::forget(SHUTDOWN_CS.enter());
        }

        fn enable_wake_from_buttons(&mut self) {
            let mask = (1u64 << pins::PLUS_BUTTON_GPIO) | (1u64 << pins::MINUS_BUTTON_GPIO);
            // SAFETY: both pins are RTC-capable inputs configured at boot.
            // Failure leaves only the reset pin as a wake source; there is
            // no way to report it here.
            let _ = unsafe {
                esp_sleep_enable_ext1_wakeup(mask, esp_sleep_ext1_wakeup_mode_t_ESP_EXT1_WAKEUP_ANY_LOW)
            };
        }

        fn enter_lowest_power_halt(&mut self) {
            // SAFETY: never returns; the next wake is a full reboot.
            unsafe { esp_deep_sleep_start() };
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

/// Host stand-in that records the power-off steps.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimPlatform {
    scheduling_suspended: bool,
    interrupts_masked: bool,
    wake_armed: bool,
    halted: bool,
    settled_iterations: u64,
}

impl SimPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduling_suspended(&self) -> bool {
        self.scheduling_suspended
    }

    pub fn interrupts_masked(&self) -> bool {
        self.interrupts_masked
    }

    pub fn wake_armed(&self) -> bool {
        self.wake_armed
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn settled_iterations(&self) -> u64 {
        self.settled_iterations
    }
}

impl PlatformPort for SimPlatform {
    fn suspend_scheduling(&mut self) {
        self.scheduling_suspended = true;
    }

    fn mask_interrupts(&mut self) {
        self.interrupts_masked = true;
    }

    fn settle(&mut self, iterations: u32) {
        crate::power::busy_wait(iterations);
        self.settled_iterations += u64::from(iterations);
    }

    fn enable_wake_from_buttons(&mut self) {
        self.wake_armed = true;
    }

    fn enter_lowest_power_halt(&mut self) {
        self.halted = true;
    }
}
