//! LEDC fade-engine adapter.
//!
//! Binds [`PwmPort`] to the ESP-IDF LEDC peripheral using raw sys calls.
//! One low-speed timer (timer 0) is shared by every configured channel;
//! the first `configure` fixes its resolution and frequency, later
//! channels must match.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: configures timer/channel registers and drives the
//! hardware fade engine.
//! On host/test: tracks duty targets in-memory only; ramps land
//! instantly.

use log::info;

use crate::duty;
use crate::error::{ConfigError, HwError};
use crate::ports::{ChannelId, CompletionPolicy, FadeSpec, PwmPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Channels in the LEDC low-speed group.
const CHANNEL_COUNT: usize = 8;

/// Poll interval while waiting for a fire-and-forget fade to land.
#[cfg(target_os = "espidf")]
const FADE_POLL_MS: u32 = 10;

#[derive(Debug, Clone, Copy)]
struct ChannelSlot {
    max_duty: u32,
    /// Target of the most recent duty command (write or ramp).
    target: u32,
}

/// Concrete [`PwmPort`] over the LEDC low-speed group.
pub struct LedcPwm {
    /// `(resolution_bits, frequency_hz)` of the shared timer, once set.
    timer: Option<(u32, u32)>,
    fade_service_installed: bool,
    slots: [Option<ChannelSlot>; CHANNEL_COUNT],
}

impl LedcPwm {
    pub fn new() -> Self {
        Self {
            timer: None,
            fade_service_installed: false,
            slots: [None; CHANNEL_COUNT],
        }
    }

    fn slot(&self, channel: ChannelId) -> Result<ChannelSlot, HwError> {
        self.slots
            .get(channel.0 as usize)
            .copied()
            .flatten()
            .ok_or(HwError::UnknownChannel(channel.0))
    }

    fn check_duty(slot: &ChannelSlot, duty: u32) -> Result<(), HwError> {
        if duty > slot.max_duty {
            return Err(HwError::DutyOutOfRange {
                duty,
                max: slot.max_duty,
            });
        }
        Ok(())
    }
}

impl Default for LedcPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmPort for LedcPwm {
    fn configure(
        &mut self,
        channel: ChannelId,
        pin: i32,
        resolution_bits: u32,
        frequency_hz: u32,
    ) -> Result<(), ConfigError> {
        if !(1..=14).contains(&resolution_bits) {
            return Err(ConfigError::Resolution(resolution_bits));
        }
        if frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if channel.0 as usize >= CHANNEL_COUNT {
            return Err(ConfigError::ChannelSetup(channel.0 as i32));
        }

        match self.timer {
            None => {
                ledc_timer_setup(resolution_bits, frequency_hz)?;
                self.timer = Some((resolution_bits, frequency_hz));
            }
            Some(cfg) if cfg != (resolution_bits, frequency_hz) => {
                return Err(ConfigError::TimerConflict);
            }
            Some(_) => {}
        }

        ledc_channel_setup(channel.0, pin)?;

        if !self.fade_service_installed {
            ledc_fade_install()?;
            self.fade_service_installed = true;
        }

        self.slots[channel.0 as usize] = Some(ChannelSlot {
            max_duty: duty::duty_max(resolution_bits),
            target: 0,
        });
        info!(
            "ledc: channel {} bound to GPIO {} ({} bit @ {} Hz)",
            channel.0, pin, resolution_bits, frequency_hz
        );
        Ok(())
    }

    fn set_duty_immediate(&mut self, channel: ChannelId, duty: u32) -> Result<(), HwError> {
        let slot = self.slot(channel)?;
        Self::check_duty(&slot, duty)?;

        ledc_write_duty(channel.0, duty)?;
        self.slots[channel.0 as usize] = Some(ChannelSlot {
            target: duty,
            ..slot
        });
        Ok(())
    }

    fn start_ramp(&mut self, channel: ChannelId, fade: FadeSpec) -> Result<(), HwError> {
        if fade.duration_ms == 0 {
            return Err(HwError::ZeroDuration);
        }
        let slot = self.slot(channel)?;
        Self::check_duty(&slot, fade.target_duty)?;

        ledc_fade_start(channel.0, fade.target_duty, fade.duration_ms, fade.policy)?;
        self.slots[channel.0 as usize] = Some(ChannelSlot {
            target: fade.target_duty,
            ..slot
        });
        Ok(())
    }

    fn wait_ramp_done(&mut self, channel: ChannelId) -> Result<(), HwError> {
        let slot = self.slot(channel)?;
        ledc_poll_until(channel.0, slot.target);
        Ok(())
    }
}

// ── ESP-IDF bindings ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn ledc_timer_setup(resolution_bits: u32, frequency_hz: u32) -> Result<(), ConfigError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: resolution_bits,
        freq_hz: frequency_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: called once from the single main-task context before the
    // glow loop starts.
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(ConfigError::TimerSetup(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn ledc_channel_setup(channel: u8, gpio: i32) -> Result<(), ConfigError> {
    let cfg = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: channel as u32,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: gpio,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    // SAFETY: single main-task context; the channel is bound before any
    // duty command can reference it.
    let ret = unsafe { ledc_channel_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(ConfigError::ChannelSetup(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn ledc_fade_install() -> Result<(), ConfigError> {
    // SAFETY: installs the fade ISR service once; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).
    let ret = unsafe { ledc_fade_func_install(0) };
    if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
        return Err(ConfigError::FadeService(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn ledc_write_duty(channel: u8, duty: u32) -> Result<(), HwError> {
    // SAFETY: the channel was bound in ledc_channel_setup(); duty
    // register writes are race-free since only the glow task commands
    // this channel.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel as u32, duty);
        if ret != ESP_OK as i32 {
            return Err(HwError::DutyWrite(ret));
        }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel as u32);
        if ret != ESP_OK as i32 {
            return Err(HwError::DutyWrite(ret));
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn ledc_fade_start(
    channel: u8,
    target_duty: u32,
    duration_ms: u32,
    policy: CompletionPolicy,
) -> Result<(), HwError> {
    let wait = match policy {
        CompletionPolicy::Block => ledc_fade_mode_t_LEDC_FADE_WAIT_DONE,
        CompletionPolicy::FireAndForget => ledc_fade_mode_t_LEDC_FADE_NO_WAIT,
    };
    // SAFETY: fade service installed during configure(); with WAIT_DONE
    // the call suspends this task until the hardware reports completion.
    let ret = unsafe {
        ledc_set_fade_time_and_start(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel as u32,
            target_duty,
            duration_ms,
            wait,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwError::FadeStart(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn ledc_poll_until(channel: u8, target: u32) {
    // The fade engine walks the shadow duty toward the target; poll it
    // rather than busy-spin so the other channel's engine keeps running.
    loop {
        // SAFETY: ledc_get_duty is a read-only register access on an
        // already-configured channel.
        let duty = unsafe { ledc_get_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel as u32) };
        if duty == target {
            return;
        }
        esp_idf_hal::delay::FreeRtos::delay_ms(FADE_POLL_MS);
    }
}

// ── Host simulation ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn ledc_timer_setup(_resolution_bits: u32, _frequency_hz: u32) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn ledc_channel_setup(_channel: u8, _gpio: i32) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn ledc_fade_install() -> Result<(), ConfigError> {
    log::info!("ledc(sim): fade service install skipped");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn ledc_write_duty(_channel: u8, _duty: u32) -> Result<(), HwError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn ledc_fade_start(
    _channel: u8,
    _target_duty: u32,
    _duration_ms: u32,
    _policy: CompletionPolicy,
) -> Result<(), HwError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn ledc_poll_until(_channel: u8, _target: u32) {}
