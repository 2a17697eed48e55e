//! Mode controller
//!
//! Owns the data every mode draws from (scroll text, last time, solar
//! figures, angle filter) and redraws the surface when the mode or its
//! data changes. Every mode switch clears the surface first, which also
//! cancels a running scroll session.

use heapless::String;

use flipdot_display::{DisplayError, DisplaySurface, Font, MAX_SCROLL_TEXT};
use flipdot_protocol::{AngleReading, Mode, PixelSource, SolarStats, WallTime};

use super::events::Event;
use crate::angle::AngleFilter;
use crate::config::FlipdotConfig;
use crate::render;

struct ScrollSettings {
    text: String<MAX_SCROLL_TEXT>,
    interval_ms: u32,
    font: &'static Font,
    y: usize,
}

pub struct ModeController {
    mode: Mode,
    default_mode: Mode,
    rotate: bool,
    angle_enabled: bool,
    client_connected: bool,
    scroll: ScrollSettings,
    time: Option<WallTime>,
    solar: Option<SolarStats>,
    angle: AngleFilter,
}

impl ModeController {
    /// Starts in the configured default mode; call [`Self::redraw`] to show it
    pub fn new(config: &FlipdotConfig) -> Self {
        Self {
            mode: config.modes.default,
            default_mode: config.modes.default,
            rotate: config.modes.rotate,
            angle_enabled: config.angle.enabled,
            client_connected: false,
            scroll: ScrollSettings {
                text: config.scroll.text.clone(),
                interval_ms: config.scroll.interval_ms,
                font: config.scroll.font.font(),
                y: config.scroll.y as usize,
            },
            time: None,
            solar: None,
            angle: AngleFilter::from_config(&config.angle),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn client_connected(&self) -> bool {
        self.client_connected
    }

    pub fn time(&self) -> Option<WallTime> {
        self.time
    }

    /// Mode after `event`, without applying it
    pub fn next_mode(&self, event: Event) -> Mode {
        use Event::*;
        use Mode::*;

        match (self.mode, event) {
            (_, ClientConnected) => Remote,
            (Remote, ClientDisconnected) => self.default_mode,

            (current, Select(Angle)) if !self.angle_enabled => current,
            (_, Select(mode)) => mode,

            (Clock, Rotate) if self.rotate => Scroll,
            (Scroll, Rotate) if self.rotate => Solar,
            (Solar, Rotate) if self.rotate => Clock,

            (current, _) => current,
        }
    }

    /// Apply `event`; returns `true` if the surface was redrawn
    pub fn handle(&mut self, event: Event, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        match event {
            Event::ClientConnected => self.client_connected = true,
            Event::ClientDisconnected => self.client_connected = false,
            _ => {}
        }

        let next = self.next_mode(event);
        if next == self.mode {
            return Ok(false);
        }
        self.mode = next;
        self.redraw(surface)?;
        Ok(true)
    }

    /// Clear the surface and draw the current mode from scratch
    pub fn redraw(&self, surface: &mut DisplaySurface) -> Result<(), DisplayError> {
        surface.clear();
        match self.mode {
            Mode::Clock => render::draw_clock(surface.framebuffer_mut(), self.time),
            Mode::Scroll => surface.start_scrolling(
                &self.scroll.text,
                0,
                self.scroll.y,
                self.scroll.interval_ms,
                self.scroll.font,
            ),
            Mode::Solar => render::draw_solar(surface.framebuffer_mut(), self.solar),
            // Blank until the client sends its first buffer
            Mode::Remote => Ok(()),
            Mode::Angle => render::draw_angle(surface.framebuffer_mut(), self.angle.target()),
        }
    }

    fn redraw_if(&self, mode: Mode, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        if self.mode != mode {
            return Ok(false);
        }
        self.redraw(surface)?;
        Ok(true)
    }

    /// Replace the scroll text, restarting the session if it is showing
    pub fn set_text(&mut self, text: &str, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        self.scroll.text = String::try_from(text).map_err(|_| DisplayError::TextTooLong)?;
        self.redraw_if(Mode::Scroll, surface)
    }

    pub fn set_time(&mut self, time: WallTime, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        self.time = Some(time);
        self.redraw_if(Mode::Clock, surface)
    }

    /// Advance the local clock by one second between host time updates
    pub fn tick_second(&mut self, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        let Some(time) = self.time else {
            return Ok(false);
        };
        self.time = Some(time.advanced_by(1));
        self.redraw_if(Mode::Clock, surface)
    }

    pub fn set_solar(&mut self, stats: SolarStats, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        self.solar = Some(stats);
        self.redraw_if(Mode::Solar, surface)
    }

    /// Feed the angle filter; incomplete readings are dropped
    pub fn push_angle(&mut self, reading: AngleReading, surface: &mut DisplaySurface) -> Result<bool, DisplayError> {
        if !self.angle.push(reading) {
            return Ok(false);
        }
        self.redraw_if(Mode::Angle, surface)
    }

    /// Copy remote pixels onto the surface, only while in remote mode
    pub fn show_pixels<P: PixelSource + ?Sized>(&self, pixels: &P, surface: &mut DisplaySurface) -> bool {
        if self.mode != Mode::Remote {
            return false;
        }
        surface.framebuffer_mut().load(pixels);
        true
    }
}
