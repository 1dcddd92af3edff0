//! Task delay adapter.
//!
//! Provides the hold suspension point for the glow sequencers.
//!
//! - **`target_os = "espidf"`** — yields to FreeRTOS via
//!   `vTaskDelay` (through `esp_idf_hal`), so the idle task and the
//!   fade-engine ISRs keep running while the glow task sleeps.
//! - **`not(target_os = "espidf")`** — uses `std::thread::sleep` for
//!   host-side runs.

use crate::ports::DelayPort;

/// Delay adapter for the glow task.
pub struct TaskDelay;

impl TaskDelay {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaskDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayPort for TaskDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
