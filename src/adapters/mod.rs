//! Driven adapters — bind the port traits to the ESP32 platform.
//!
//! Each adapter is dual-target: real peripheral access under
//! `#[cfg(target_os = "espidf")]`, in-memory simulation on the host.

pub mod ledc;
pub mod time;
