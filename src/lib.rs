//! Ventilation fan controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod power;

pub mod pins;

// Adapters and drivers carry both the ESP-IDF and the host implementations;
// the target-specific halves are cfg-gated inside.
pub mod adapters;
pub mod drivers;
