//! RP2040-specific HAL for the flip-dot display firmware
//!
//! Implements the `flipdot-hal` traits on top of embassy-rp:
//!
//! - Blocking UART transmitter for the RS-485 panel line
//! - Driver-enable output pin
//! - UART pin mapping checks for config-driven setup

#![no_std]

pub mod gpio;
pub mod uart;

pub use flipdot_hal::{OutputPin, Rs485Tx, UartConfig, UartTx};
pub use gpio::DriverEnable;
pub use uart::{PanelUart, PinRole, UartError, UartId, UartPin};
