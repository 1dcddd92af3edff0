//! System configuration parameters
//!
//! All tunable parameters for the glow effect.  Everything is fixed at
//! build time; the struct exists so sequencers can be constructed with
//! arbitrary settings in tests instead of reading compile-time globals.

use crate::duty;
use crate::error::ConfigError;
use crate::pins;

/// Which filament channels the board drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowMode {
    /// One channel breathing between 0 and the high target.
    Single { gpio: i32 },
    /// Two channels crossfading in opposite phase.
    DualInverse { gpio_a: i32, gpio_b: i32 },
}

/// Core glow configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlowConfig {
    /// Channel layout and pin binding.
    pub mode: GlowMode,
    /// High brightness target (0–100 %).
    pub high_percent: u32,
    /// Duration of one ramp (milliseconds).
    pub ramp_ms: u32,
    /// Hold between the end of one ramp and the start of the next.
    pub hold_ms: u32,
    /// LEDC base frequency (Hz).
    pub frequency_hz: u32,
    /// LEDC timer resolution (bits).
    pub resolution_bits: u32,
}

impl GlowConfig {
    /// Single-channel breathing effect on the reference board.
    pub fn single() -> Self {
        Self {
            mode: GlowMode::Single {
                gpio: pins::GLOW_A_GPIO,
            },
            high_percent: 80,
            ramp_ms: 1000,
            hold_ms: 500,
            frequency_hz: pins::GLOW_PWM_FREQ_HZ,
            resolution_bits: pins::GLOW_DUTY_RES_BITS,
        }
    }

    /// Dual-channel inverse crossfade on the reference board.
    pub fn dual_inverse() -> Self {
        Self {
            mode: GlowMode::DualInverse {
                gpio_a: pins::GLOW_A_GPIO,
                gpio_b: pins::GLOW_B_GPIO,
            },
            high_percent: 80,
            ramp_ms: 1000,
            hold_ms: 1000,
            frequency_hz: pins::GLOW_PWM_FREQ_HZ,
            resolution_bits: pins::GLOW_DUTY_RES_BITS,
        }
    }

    /// Maximum duty value for the configured timer resolution.
    pub fn duty_max(&self) -> u32 {
        duty::duty_max(self.resolution_bits)
    }

    /// Duty value of the high brightness target.
    pub fn high_duty(&self) -> u32 {
        duty::percent_to_duty(self.high_percent, self.duty_max())
    }

    /// Reject settings the LEDC peripheral cannot run.
    ///
    /// `high_percent` above 100 is deliberately NOT rejected — the duty
    /// mapper clamps it, preserving the permissive input range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=14).contains(&self.resolution_bits) {
            return Err(ConfigError::Resolution(self.resolution_bits));
        }
        if self.ramp_ms == 0 {
            return Err(ConfigError::ZeroRampDuration);
        }
        if self.frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(())
    }
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self::dual_inverse()
    }
}
