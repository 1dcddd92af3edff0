//! Glowlamp Firmware — Main Entry Point
//!
//! Hexagonal architecture: the glow sequencer (pure logic) drives the
//! LEDC fade engine and the FreeRTOS delay through port traits.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              Adapters (outer ring)               │
//! │                                                  │
//! │   LedcPwm (PwmPort)       TaskDelay (DelayPort)  │
//! │                                                  │
//! │  ─────────── Port Trait Boundary ───────────     │
//! │                                                  │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │  GlowSequencer / InverseGlowSequencer      │  │
//! │  │  (duty mapping · phase machine)            │  │
//! │  └────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{bail, Result};
use log::{error, info};

use glowlamp::adapters::ledc::LedcPwm;
use glowlamp::adapters::time::TaskDelay;
use glowlamp::config::{GlowConfig, GlowMode};
use glowlamp::glow::{GlowSequencer, InverseGlowSequencer};
use glowlamp::pins;
use glowlamp::ports::{ChannelId, PwmPort};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Glowlamp v{} starting...", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = GlowConfig::default();
    if let Err(e) = config.validate() {
        error!("Glow config rejected: {e} — aborting");
        bail!("glow config rejected: {e}");
    }

    // ── 3. LEDC setup — fatal on failure ──────────────────────
    // A misconfigured timer/channel cannot safely drive the loop, so
    // any setup error aborts before the glow loop is entered.
    let mut pwm = LedcPwm::new();
    let mut pace = TaskDelay::new();

    match config.mode {
        GlowMode::Single { gpio } => {
            let ch = ChannelId(pins::LEDC_CH_GLOW_A);
            if let Err(e) = pwm.configure(ch, gpio, config.resolution_bits, config.frequency_hz) {
                error!("LEDC setup failed: {e} — halting before glow loop");
                bail!("LEDC setup failed: {e}");
            }

            info!("Glowlamp initialized (single channel, GPIO {gpio})");

            // ── 4. Glow loop ──────────────────────────────────
            let mut seq = GlowSequencer::new(&config, ch);
            if let Err(e) = seq.run(&mut pwm, &mut pace) {
                error!("Glow loop aborted on hardware fault: {e}");
                bail!("glow loop aborted: {e}");
            }
        }
        GlowMode::DualInverse { gpio_a, gpio_b } => {
            let ch_a = ChannelId(pins::LEDC_CH_GLOW_A);
            let ch_b = ChannelId(pins::LEDC_CH_GLOW_B);
            for (ch, gpio) in [(ch_a, gpio_a), (ch_b, gpio_b)] {
                if let Err(e) = pwm.configure(ch, gpio, config.resolution_bits, config.frequency_hz)
                {
                    error!("LEDC setup failed on GPIO {gpio}: {e} — halting before glow loop");
                    bail!("LEDC setup failed: {e}");
                }
            }

            info!("Glowlamp initialized (dual inverse, GPIO {gpio_a}/{gpio_b})");

            // ── 4. Glow loop ──────────────────────────────────
            let mut seq = InverseGlowSequencer::new(&config, ch_a, ch_b);
            if let Err(e) = seq.prime(&mut pwm) {
                error!("Initial duty write failed: {e} — halting before glow loop");
                bail!("initial duty write failed: {e}");
            }
            if let Err(e) = seq.run(&mut pwm, &mut pace) {
                error!("Glow loop aborted on hardware fault: {e}");
                bail!("glow loop aborted: {e}");
            }
        }
    }

    Ok(())
}
