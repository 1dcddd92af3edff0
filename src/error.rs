//! Unified error types for the glow lamp firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform.  All variants are
//! `Copy` so they pass through the sequencer without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral setup failed before the glow loop was entered.
    Config(ConfigError),
    /// A runtime hardware call failed inside the glow loop.
    Hw(HwError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hw(e) => write!(f, "hw: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Peripheral setup errors
// ---------------------------------------------------------------------------

/// One-time LEDC setup failures.  Always unrecoverable: a misconfigured
/// timer or channel cannot safely drive the glow loop, so startup aborts
/// before the loop is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// LEDC timer register configuration was rejected (rc from the driver).
    TimerSetup(i32),
    /// LEDC channel register configuration was rejected.
    ChannelSetup(i32),
    /// The fade-engine ISR service could not be installed.
    FadeService(i32),
    /// A channel requested a frequency/resolution different from the one
    /// the shared timer was already configured with.
    TimerConflict,
    /// Duty resolution outside the range the low-speed timers support.
    Resolution(u32),
    /// Ramp duration of zero — the fade engine requires a positive time.
    ZeroRampDuration,
    /// PWM base frequency of zero.
    ZeroFrequency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimerSetup(rc) => write!(f, "LEDC timer config failed (rc={rc})"),
            Self::ChannelSetup(rc) => write!(f, "LEDC channel config failed (rc={rc})"),
            Self::FadeService(rc) => write!(f, "fade service install failed (rc={rc})"),
            Self::TimerConflict => write!(f, "channel conflicts with shared timer settings"),
            Self::Resolution(bits) => write!(f, "unsupported duty resolution ({bits} bit)"),
            Self::ZeroRampDuration => write!(f, "ramp duration must be positive"),
            Self::ZeroFrequency => write!(f, "PWM frequency must be positive"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Runtime hardware errors
// ---------------------------------------------------------------------------

/// Runtime failures at the LEDC driver boundary.  Not expected in correct
/// operation (duty values are pre-clamped by the duty mapper); if one
/// occurs the glow loop stops rather than continuing with unknown
/// hardware state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// The channel was never configured (or is outside the LEDC group).
    UnknownChannel(u8),
    /// Commanded duty exceeds the timer's maximum.
    DutyOutOfRange { duty: u32, max: u32 },
    /// Direct duty write was rejected by the driver.
    DutyWrite(i32),
    /// The fade engine rejected a ramp command.
    FadeStart(i32),
    /// Ramp command with a zero duration.
    ZeroDuration,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel(ch) => write!(f, "channel {ch} not configured"),
            Self::DutyOutOfRange { duty, max } => {
                write!(f, "duty {duty} exceeds max {max}")
            }
            Self::DutyWrite(rc) => write!(f, "duty write failed (rc={rc})"),
            Self::FadeStart(rc) => write!(f, "fade start failed (rc={rc})"),
            Self::ZeroDuration => write!(f, "ramp duration must be positive"),
        }
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Self::Hw(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
