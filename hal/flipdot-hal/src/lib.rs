//! Flip-dot Hardware Abstraction Layer
//!
//! Traits the display pipeline needs from the board, implemented by
//! chip-specific HALs:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  flipdot-display / flipdot-firmware     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  flipdot-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ flipdot-hal-    │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! - [`uart::UartTx`] - the byte sink panel frames are written to
//! - [`gpio::OutputPin`] - RS-485 driver-enable line
//! - [`rs485::Rs485Tx`] - half-duplex transmitter built from the two

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod rs485;
pub mod uart;

pub use gpio::OutputPin;
pub use rs485::Rs485Tx;
pub use uart::{UartConfig, UartTx};
