//! Board-agnostic core logic for the flip-dot display firmware
//!
//! Everything here runs on the host as well as on the target:
//!
//! - Configuration types and the embedded TOML-subset parser
//! - Mode state machine deciding what the display shows
//! - Renderers for the clock, solar and angle screens
//! - Median filter for the angle sensor

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod angle;
pub mod config;
pub mod render;
pub mod state;
