//! Port traits — the boundary between the glow logic and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GlowSequencer (domain)
//! ```
//!
//! Driven adapters (the LEDC fade engine, the FreeRTOS delay) implement
//! these traits.  The sequencers consume them via generics, so the glow
//! logic never touches hardware directly and runs against mocks on the
//! host.

use crate::error::{ConfigError, HwError};

// ───────────────────────────────────────────────────────────────
// Channel identity and ramp parameters
// ───────────────────────────────────────────────────────────────

/// Identity of one PWM output channel, assigned at configure time.
/// Maps to an LEDC low-speed channel number on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelId(pub u8);

/// Completion policy of a ramp command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Suspend the issuing task until the hardware reports the ramp done.
    Block,
    /// Return as soon as the ramp is commanded; the fade engine runs on
    /// autonomously.
    FireAndForget,
}

/// Parameters of a single ramp command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeSpec {
    /// Duty value to ramp to (0..=duty_max of the channel's timer).
    pub target_duty: u32,
    /// Ramp duration in milliseconds (must be positive).
    pub duration_ms: u32,
    /// Whether the call blocks until the ramp lands.
    pub policy: CompletionPolicy,
}

// ───────────────────────────────────────────────────────────────
// PWM port (driven adapter: domain → fade engine)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the glow sequencers drive PWM hardware through this.
pub trait PwmPort {
    /// One-time channel setup, before the glow loop starts.  Binds the
    /// channel to a GPIO on the shared timer.  Fatal on failure.
    fn configure(
        &mut self,
        channel: ChannelId,
        pin: i32,
        resolution_bits: u32,
        frequency_hz: u32,
    ) -> Result<(), ConfigError>;

    /// Direct duty write with no ramp.  Used only to prime the initial
    /// state of the dual-channel crossfade.
    fn set_duty_immediate(&mut self, channel: ChannelId, duty: u32) -> Result<(), HwError>;

    /// Begin an autonomous duty transition on `channel`.
    fn start_ramp(&mut self, channel: ChannelId, fade: FadeSpec) -> Result<(), HwError>;

    /// Block until the most recently commanded ramp on `channel` reports
    /// completion.  No-op when no ramp is in flight.
    fn wait_ramp_done(&mut self, channel: ChannelId) -> Result<(), HwError>;
}

// ───────────────────────────────────────────────────────────────
// Delay port (driven adapter: domain → task suspension)
// ───────────────────────────────────────────────────────────────

/// How the sequencer holds between ramps.  Tests inject a virtual clock
/// here instead of sleeping.
pub trait DelayPort {
    fn delay_ms(&mut self, ms: u32);
}
