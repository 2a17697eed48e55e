//! Rendering pipeline for the 14x28 flip-dot display
//!
//! This crate provides:
//! - Bitmap fonts and a proportional glyph rasterizer
//! - `Framebuffer`, the 1-bit drawing surface
//! - `DisplaySurface`, which owns the framebuffer together with the
//!   scrolling-text session so one lock guards both
//! - `PanelDriver`, which encodes a framebuffer into panel frames and
//!   writes them to any `flipdot_hal::UartTx`
//!
//! # Pipeline
//!
//! ```text
//! draw_string / draw_bitmap / set_pixel
//!            │
//!            ▼
//!      Framebuffer ──encode──▶ FramePair ──UartTx──▶ RS-485 boards
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod font;
pub mod fonts;
pub mod framebuffer;
pub mod glyph;
pub mod surface;

// Re-export key types
pub use backend::{DisplayError, PanelDriver, TransportError};
pub use font::{Font, Spacing};
pub use framebuffer::{Cursor, Framebuffer, HEIGHT, WIDTH};
pub use glyph::{text_width, GlyphMetrics};
pub use surface::{DisplaySurface, FrameObserver, MAX_SCROLL_TEXT};
