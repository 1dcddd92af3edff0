//! Mock PWM adapter for integration tests.
//!
//! Records every port call and advances a shared virtual clock, so tests
//! can assert on the full command history and on cycle timing without
//! real hardware delays.  Ramp completion is modeled the way the LEDC
//! fade engine behaves: each channel's engine runs autonomously from the
//! moment the ramp is commanded, and a wait only advances the clock to
//! that ramp's completion time.

use std::cell::Cell;
use std::rc::Rc;

use glowlamp::error::{ConfigError, HwError};
use glowlamp::ports::{ChannelId, CompletionPolicy, DelayPort, FadeSpec, PwmPort};

/// Virtual milliseconds shared between the PWM mock and the delay mock.
pub type Clock = Rc<Cell<u64>>;

pub fn new_clock() -> Clock {
    Rc::new(Cell::new(0))
}

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmCall {
    Configure {
        channel: u8,
        pin: i32,
    },
    SetDuty {
        channel: u8,
        duty: u32,
    },
    StartRamp {
        channel: u8,
        target: u32,
        duration_ms: u32,
        policy: CompletionPolicy,
    },
    WaitRampDone {
        channel: u8,
    },
}

// ── MockPwm ───────────────────────────────────────────────────

const CHANNELS: usize = 8;

pub struct MockPwm {
    pub calls: Vec<PwmCall>,
    /// Duty the hardware would show once all commanded ramps landed.
    pub duty: [u32; CHANNELS],
    /// Ramps commanded but not yet awaited: `(start_ms, fade)`.
    in_flight: [Option<(u64, FadeSpec)>; CHANNELS],
    /// Times `start_ramp` was called while a prior ramp on the same
    /// channel was still in flight.
    pub overlap_violations: usize,
    pub fail_ramps: bool,
    clock: Clock,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new(clock: Clock) -> Self {
        Self {
            calls: Vec::new(),
            duty: [0; CHANNELS],
            in_flight: [None; CHANNELS],
            overlap_violations: 0,
            fail_ramps: false,
            clock,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.get()
    }

    /// Targets of every ramp commanded on `channel`, in issue order.
    pub fn ramp_targets(&self, channel: u8) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PwmCall::StartRamp { channel: ch, target, .. } if *ch == channel => Some(*target),
                _ => None,
            })
            .collect()
    }
}

impl PwmPort for MockPwm {
    fn configure(
        &mut self,
        channel: ChannelId,
        pin: i32,
        _resolution_bits: u32,
        _frequency_hz: u32,
    ) -> Result<(), ConfigError> {
        self.calls.push(PwmCall::Configure {
            channel: channel.0,
            pin,
        });
        Ok(())
    }

    fn set_duty_immediate(&mut self, channel: ChannelId, duty: u32) -> Result<(), HwError> {
        self.calls.push(PwmCall::SetDuty {
            channel: channel.0,
            duty,
        });
        self.duty[channel.0 as usize] = duty;
        Ok(())
    }

    fn start_ramp(&mut self, channel: ChannelId, fade: FadeSpec) -> Result<(), HwError> {
        if self.fail_ramps {
            return Err(HwError::FadeStart(-1));
        }
        let ch = channel.0 as usize;
        if self.in_flight[ch].is_some() {
            self.overlap_violations += 1;
        }
        self.calls.push(PwmCall::StartRamp {
            channel: channel.0,
            target: fade.target_duty,
            duration_ms: fade.duration_ms,
            policy: fade.policy,
        });
        match fade.policy {
            CompletionPolicy::Block => {
                // The issuing task suspends for the whole ramp.
                self.clock
                    .set(self.clock.get() + u64::from(fade.duration_ms));
                self.duty[ch] = fade.target_duty;
            }
            CompletionPolicy::FireAndForget => {
                self.in_flight[ch] = Some((self.clock.get(), fade));
            }
        }
        Ok(())
    }

    fn wait_ramp_done(&mut self, channel: ChannelId) -> Result<(), HwError> {
        self.calls.push(PwmCall::WaitRampDone {
            channel: channel.0,
        });
        let ch = channel.0 as usize;
        if let Some((start_ms, fade)) = self.in_flight[ch].take() {
            // The engine has been running since start_ms; only sleep the
            // remainder (possibly nothing if another wait covered it).
            let done_at = start_ms + u64::from(fade.duration_ms);
            self.clock.set(self.clock.get().max(done_at));
            self.duty[ch] = fade.target_duty;
        }
        Ok(())
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Delay port over the shared virtual clock.
pub struct MockDelay {
    clock: Clock,
}

impl MockDelay {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

impl DelayPort for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.clock.set(self.clock.get() + u64::from(ms));
    }
}
