//! Glow sequencers — the breathing and crossfade state machines.
//!
//! The free-running fade task of the original firmware re-expressed as
//! explicit state machines: each `step()` performs exactly one phase
//! transition and then returns, so a test can drive whole cycles against
//! a mock fade engine and virtual clock.  `run()` is the firmware entry:
//! it loops `step()` forever.
//!
//! ```text
//! Single channel:                Dual channel (inverse):
//!
//!   RampingUp ──▶ HoldUp            AUpBDown ──▶ HoldAHigh
//!       ▲            │                  ▲             │
//!       │            ▼                  │             ▼
//!   HoldDown ◀── RampingDown        HoldBHigh ◀── ADownBUp
//! ```
//!
//! Suspension points are exactly the blocking ramp waits and the holds;
//! the fade engine updates duty autonomously in hardware while the task
//! sleeps.

use log::info;

use crate::config::GlowConfig;
use crate::duty::{duty_max, percent_to_duty};
use crate::error::HwError;
use crate::ports::{ChannelId, CompletionPolicy, DelayPort, FadeSpec, PwmPort};

// ---------------------------------------------------------------------------
// Single-channel breathing effect
// ---------------------------------------------------------------------------

/// Phase of the single-channel glow cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowPhase {
    RampingUp,
    HoldUp,
    RampingDown,
    HoldDown,
}

/// One filament channel breathing between 0 and the high target.
pub struct GlowSequencer {
    channel: ChannelId,
    phase: GlowPhase,
    /// Last commanded duty target.
    duty: u32,
    high_duty: u32,
    ramp_ms: u32,
    hold_ms: u32,
}

impl GlowSequencer {
    /// Build the sequencer from configuration.  The channel must already
    /// be configured on the PWM port; duty is assumed to start at 0.
    pub fn new(config: &GlowConfig, channel: ChannelId) -> Self {
        let max = duty_max(config.resolution_bits);
        Self {
            channel,
            phase: GlowPhase::RampingUp,
            duty: 0,
            high_duty: percent_to_duty(config.high_percent, max),
            ramp_ms: config.ramp_ms,
            hold_ms: config.hold_ms,
        }
    }

    pub fn phase(&self) -> GlowPhase {
        self.phase
    }

    /// Last commanded duty target.
    pub fn current_duty(&self) -> u32 {
        self.duty
    }

    pub fn high_duty(&self) -> u32 {
        self.high_duty
    }

    /// Perform exactly one phase transition.
    ///
    /// Ramp phases issue a blocking fade command and return when the
    /// hardware reports the target reached; hold phases suspend on the
    /// delay port.  A new ramp is therefore never issued while a prior
    /// one is still in flight.
    pub fn step(&mut self, pwm: &mut impl PwmPort, pace: &mut impl DelayPort) -> Result<(), HwError> {
        match self.phase {
            GlowPhase::RampingUp => {
                info!("Fading in...");
                pwm.start_ramp(
                    self.channel,
                    FadeSpec {
                        target_duty: self.high_duty,
                        duration_ms: self.ramp_ms,
                        policy: CompletionPolicy::Block,
                    },
                )?;
                self.duty = self.high_duty;
                self.phase = GlowPhase::HoldUp;
            }
            GlowPhase::HoldUp => {
                pace.delay_ms(self.hold_ms);
                self.phase = GlowPhase::RampingDown;
            }
            GlowPhase::RampingDown => {
                info!("Fading out...");
                pwm.start_ramp(
                    self.channel,
                    FadeSpec {
                        target_duty: 0,
                        duration_ms: self.ramp_ms,
                        policy: CompletionPolicy::Block,
                    },
                )?;
                self.duty = 0;
                self.phase = GlowPhase::HoldDown;
            }
            GlowPhase::HoldDown => {
                pace.delay_ms(self.hold_ms);
                self.phase = GlowPhase::RampingUp;
            }
        }
        Ok(())
    }

    /// Run the glow cycle forever.  Returns only on a hardware fault.
    pub fn run(&mut self, pwm: &mut impl PwmPort, pace: &mut impl DelayPort) -> Result<(), HwError> {
        info!("Starting LED filament glow effect");
        loop {
            self.step(pwm, pace)?;
        }
    }
}

// ---------------------------------------------------------------------------
// Dual-channel inverse crossfade
// ---------------------------------------------------------------------------

/// Phase of the dual-channel crossfade cycle.  The name records where
/// the channels land: after `AUpBDown`, A holds at the high target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InversePhase {
    AUpBDown,
    HoldAHigh,
    ADownBUp,
    HoldBHigh,
}

/// Two filament channels ramping to opposite targets in lockstep.
pub struct InverseGlowSequencer {
    channel_a: ChannelId,
    channel_b: ChannelId,
    phase: InversePhase,
    duty_a: u32,
    duty_b: u32,
    high_duty: u32,
    ramp_ms: u32,
    hold_ms: u32,
}

impl InverseGlowSequencer {
    /// Build the sequencer from configuration.  Call [`prime`] before
    /// the first [`step`] so the channels start in opposite phase.
    ///
    /// [`prime`]: Self::prime
    /// [`step`]: Self::step
    pub fn new(config: &GlowConfig, channel_a: ChannelId, channel_b: ChannelId) -> Self {
        let max = duty_max(config.resolution_bits);
        Self {
            channel_a,
            channel_b,
            phase: InversePhase::AUpBDown,
            duty_a: 0,
            duty_b: 0,
            high_duty: percent_to_duty(config.high_percent, max),
            ramp_ms: config.ramp_ms,
            hold_ms: config.hold_ms,
        }
    }

    pub fn phase(&self) -> InversePhase {
        self.phase
    }

    /// Last commanded duty targets, `(A, B)`.
    pub fn duties(&self) -> (u32, u32) {
        (self.duty_a, self.duty_b)
    }

    pub fn high_duty(&self) -> u32 {
        self.high_duty
    }

    /// Put the channels in opposite phase with direct duty writes: A at
    /// 0, B at the high target.  Runs once before the loop so the first
    /// cycle starts from a correct state with no transient flash.
    pub fn prime(&mut self, pwm: &mut impl PwmPort) -> Result<(), HwError> {
        pwm.set_duty_immediate(self.channel_a, 0)?;
        pwm.set_duty_immediate(self.channel_b, self.high_duty)?;
        self.duty_a = 0;
        self.duty_b = self.high_duty;
        Ok(())
    }

    /// Perform exactly one phase transition.
    pub fn step(&mut self, pwm: &mut impl PwmPort, pace: &mut impl DelayPort) -> Result<(), HwError> {
        match self.phase {
            InversePhase::AUpBDown => {
                info!("Crossfading: A up, B down");
                self.crossfade(pwm, self.high_duty, 0)?;
                self.phase = InversePhase::HoldAHigh;
            }
            InversePhase::HoldAHigh => {
                pace.delay_ms(self.hold_ms);
                self.phase = InversePhase::ADownBUp;
            }
            InversePhase::ADownBUp => {
                info!("Crossfading: A down, B up");
                self.crossfade(pwm, 0, self.high_duty)?;
                self.phase = InversePhase::HoldBHigh;
            }
            InversePhase::HoldBHigh => {
                pace.delay_ms(self.hold_ms);
                self.phase = InversePhase::AUpBDown;
            }
        }
        Ok(())
    }

    /// Run the crossfade cycle forever.  Returns only on a hardware fault.
    pub fn run(&mut self, pwm: &mut impl PwmPort, pace: &mut impl DelayPort) -> Result<(), HwError> {
        info!("Starting inverse glow effect");
        loop {
            self.step(pwm, pace)?;
        }
    }

    /// Command both ramps back-to-back as fire-and-forget, then await
    /// completion in issue order.  Both fade engines run concurrently
    /// once commanded; the hold is not entered until both have landed.
    fn crossfade(
        &mut self,
        pwm: &mut impl PwmPort,
        target_a: u32,
        target_b: u32,
    ) -> Result<(), HwError> {
        pwm.start_ramp(
            self.channel_a,
            FadeSpec {
                target_duty: target_a,
                duration_ms: self.ramp_ms,
                policy: CompletionPolicy::FireAndForget,
            },
        )?;
        pwm.start_ramp(
            self.channel_b,
            FadeSpec {
                target_duty: target_b,
                duration_ms: self.ramp_ms,
                policy: CompletionPolicy::FireAndForget,
            },
        )?;
        pwm.wait_ramp_done(self.channel_a)?;
        pwm.wait_ramp_done(self.channel_b)?;
        self.duty_a = target_a;
        self.duty_b = target_b;
        Ok(())
    }
}
