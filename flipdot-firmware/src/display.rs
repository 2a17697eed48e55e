//! Shared display state
//!
//! The surface and the panel driver live together behind one mutex. A
//! scroll tick pushes its frame to the panel while still holding the lock,
//! so a mode switch can never interleave with a half-finished tick.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use flipdot_display::{DisplaySurface, FrameObserver, Framebuffer, PanelDriver};
use flipdot_hal_rp2040::{DriverEnable, PanelUart, Rs485Tx};

use crate::channels::FRAMES_SENT;

/// RS-485 panel transmitter
pub type PanelTx = Rs485Tx<PanelUart<'static>, DriverEnable<'static>>;

pub type DisplayMutex = Mutex<CriticalSectionRawMutex, Display>;

pub struct Display {
    pub surface: DisplaySurface,
    pub panel: PanelDriver<PanelTx>,
}

impl Display {
    pub fn new(panel: PanelDriver<PanelTx>) -> Self {
        Self {
            surface: DisplaySurface::new(),
            panel,
        }
    }

    /// Flip every dot dark, independent of the framebuffer
    pub fn blank_panel(&mut self) {
        if let Err(e) = self.panel.all_off() {
            warn!("Panel blank failed: {:?}", e);
        }
    }

    /// Send the current framebuffer to the panel
    pub fn present(&mut self) {
        send(&mut self.panel, self.surface.framebuffer());
    }

    /// Run one scroll step, pushing the frame it draws
    pub fn scroll_tick(&mut self) -> bool {
        let Display { surface, panel } = self;
        surface.scroll_tick(&mut PanelObserver { panel })
    }
}

struct PanelObserver<'a> {
    panel: &'a mut PanelDriver<PanelTx>,
}

impl FrameObserver for PanelObserver<'_> {
    fn on_update(&mut self, framebuffer: &Framebuffer) {
        send(self.panel, framebuffer);
    }
}

fn send(panel: &mut PanelDriver<PanelTx>, framebuffer: &Framebuffer) {
    match panel.show(framebuffer) {
        Ok(()) => {
            FRAMES_SENT.fetch_add(1, Ordering::Relaxed);
            trace!("Frame sent, {} dots lit", framebuffer.lit_count());
        }
        Err(e) => warn!("Panel update failed: {:?}", e),
    }
}
