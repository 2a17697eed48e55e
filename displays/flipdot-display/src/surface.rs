//! Display surface: the framebuffer plus the optional scrolling session
//!
//! Both live in one value so a single lock serializes every writer. A
//! scroll tick runs entirely while the caller holds that lock, which means
//! once [`DisplaySurface::clear`] returns no tick of the dropped session
//! can still be running or run again.

use heapless::Vec;

use crate::backend::DisplayError;
use crate::font::{char_code, Font};
use crate::framebuffer::{Cursor, Framebuffer};

/// Longest scroll text in bytes
pub const MAX_SCROLL_TEXT: usize = 128;

/// Receives every frame a scroll tick produces
pub trait FrameObserver {
    fn on_update(&mut self, framebuffer: &Framebuffer);
}

impl<F: FnMut(&Framebuffer)> FrameObserver for F {
    fn on_update(&mut self, framebuffer: &Framebuffer) {
        self(framebuffer)
    }
}

struct ScrollSession {
    codes: Vec<u8, MAX_SCROLL_TEXT>,
    /// Position of the first drawn character; `codes.len()` shows a blank frame
    index: usize,
    x: usize,
    y: usize,
    interval_ms: u32,
    font: &'static Font,
}

impl ScrollSession {
    fn advance(&mut self) {
        self.index = (self.index + 1) % (self.codes.len() + 1);
    }
}

/// Owner of everything that gets drawn
#[derive(Default)]
pub struct DisplaySurface {
    framebuffer: Framebuffer,
    scroll: Option<ScrollSession>,
}

impl DisplaySurface {
    pub const fn new() -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            scroll: None,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Direct access for static drawing
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) -> Result<(), DisplayError> {
        self.framebuffer.set_pixel(x, y, value)
    }

    pub fn draw_string(
        &mut self,
        text: &str,
        x: usize,
        y: usize,
        font: &Font,
        wrap: bool,
    ) -> Result<Cursor, DisplayError> {
        self.framebuffer.draw_string(text, x, y, font, wrap)
    }

    pub fn draw_bitmap(
        &mut self,
        width: usize,
        height: usize,
        bitmap: &[u8],
        x: usize,
        y: usize,
        invert: bool,
    ) -> Result<(), DisplayError> {
        self.framebuffer.draw_bitmap(width, height, bitmap, x, y, invert)
    }

    /// Drop any scroll session, then blank the framebuffer
    pub fn clear(&mut self) {
        self.scroll = None;
        self.framebuffer.clear();
    }

    /// Arm a scrolling-text session
    ///
    /// The text is copied; the first tick shows it from its first character.
    pub fn start_scrolling(
        &mut self,
        text: &str,
        x: usize,
        y: usize,
        interval_ms: u32,
        font: &'static Font,
    ) -> Result<(), DisplayError> {
        if self.scroll.is_some() {
            return Err(DisplayError::AlreadyRunning);
        }
        if interval_ms == 0 {
            return Err(DisplayError::InvalidInterval);
        }
        if text.len() > MAX_SCROLL_TEXT {
            return Err(DisplayError::TextTooLong);
        }

        let mut codes = Vec::new();
        for ch in text.chars() {
            codes
                .push(char_code(ch))
                .map_err(|_| DisplayError::TextTooLong)?;
        }

        let index = codes.len();
        self.scroll = Some(ScrollSession {
            codes,
            index,
            x,
            y,
            interval_ms,
            font,
        });
        Ok(())
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Milliseconds between ticks of the active session
    pub fn scroll_interval(&self) -> Option<u32> {
        self.scroll.as_ref().map(|s| s.interval_ms)
    }

    /// Advance the scroll session by one step
    ///
    /// Redraws the text from the next read position, stopping at the right
    /// edge, and hands the frame to `observer`. Returns `false` without
    /// touching anything if no session is active.
    pub fn scroll_tick<O: FrameObserver + ?Sized>(&mut self, observer: &mut O) -> bool {
        let Some(session) = self.scroll.as_mut() else {
            return false;
        };

        session.advance();
        self.framebuffer.clear();

        let rest = session.codes[session.index..].iter().copied();
        // Without wrap, running off the edge is not an error
        let _ = self
            .framebuffer
            .draw_codes(rest, session.x, session.y, session.font, false);

        observer.on_update(&self.framebuffer);
        true
    }
}
