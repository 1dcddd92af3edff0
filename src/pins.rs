//! GPIO / peripheral pin assignments for the glow lamp board.
//!
//! Single source of truth — every adapter references this module rather
//! than hard-coding pin numbers.  Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Filament LED channels (constant-current MOSFET drivers)
// ---------------------------------------------------------------------------

/// LEDC PWM output for filament channel A.
pub const GLOW_A_GPIO: i32 = 2;
/// LEDC PWM output for filament channel B (dual-channel boards only).
pub const GLOW_B_GPIO: i32 = 4;

/// LEDC channel number for filament A (low-speed group).
pub const LEDC_CH_GLOW_A: u8 = 0;
/// LEDC channel number for filament B (low-speed group).
pub const LEDC_CH_GLOW_B: u8 = 1;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  13-bit gives 0 – 8191 duty levels,
/// fine enough that a 1 s ramp reads as continuous on a filament LED.
pub const GLOW_DUTY_RES_BITS: u32 = 13;
/// LEDC base frequency for the filament channels (5 kHz — flicker-free).
pub const GLOW_PWM_FREQ_HZ: u32 = 5_000;
