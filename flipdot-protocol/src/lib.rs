//! Flip-dot wire protocols
//!
//! This crate defines both byte formats the firmware speaks:
//!
//! - **Panel frames** ([`panel`]): the fixed 32-byte frames the RS-485 panel
//!   controllers expect. A 14x28 display is two 7-row boards, so every
//!   update is a [`FramePair`].
//! - **Host link** ([`frame`], [`messages`]): the framed UART protocol used by
//!   the network co-processor (the "host bridge") to push pixels, mode
//!   changes, time and statistics into the firmware.
//!
//! ```text
//! host bridge ──(host link)──▶ firmware ──(panel frames)──▶ RS-485 boards
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod mode;
pub mod panel;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{
    AngleReading, DisplayReply, HostMessage, PackedPixels, SolarStats, WallTime,
};
pub use mode::Mode;
pub use panel::{
    encode, encode_flat, FlatPixels, FramePair, PanelFrame, PixelSource, ADDR_BOTTOM, ADDR_TOP,
    ALL_BRIGHT, ALL_DARK, PANEL_COLS, PANEL_FRAME_LEN, PANEL_ROWS, PIXEL_COUNT,
};
