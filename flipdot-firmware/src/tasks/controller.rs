//! Controller task
//!
//! Owns the mode controller. Applies host commands, the rotation timer and
//! the one-second clock tick to the shared surface, then pushes the result
//! to the panel.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Ticker};

use flipdot_core::config::FlipdotConfig;
use flipdot_core::state::{Event, ModeController};
use flipdot_display::DisplayError;

use crate::channels::{Command, COMMANDS, SCROLL_WAKE};
use crate::display::{Display, DisplayMutex};

#[embassy_executor::task]
pub async fn controller_task(display: &'static DisplayMutex, config: &'static FlipdotConfig) {
    info!("Controller task started");

    let mut controller = ModeController::new(config);
    {
        let mut display = display.lock().await;
        let result = controller.redraw(&mut display.surface).map(|()| true);
        finish(result, &mut display);
    }
    info!("Initial mode: {:?}", controller.mode());

    let mut rotate = Ticker::every(Duration::from_secs(config.modes.rotate_s as u64));
    let mut seconds = Ticker::every(Duration::from_secs(1));

    loop {
        let wake = select3(COMMANDS.receive(), rotate.next(), seconds.next()).await;

        let mut display = display.lock().await;
        let before = controller.mode();

        let result = match wake {
            Either3::First(command) => apply(&mut controller, command, &mut display),
            Either3::Second(()) => controller.handle(Event::Rotate, &mut display.surface),
            Either3::Third(()) => controller.tick_second(&mut display.surface),
        };
        finish(result, &mut display);

        if controller.mode() != before {
            info!("Mode {:?} -> {:?}", before, controller.mode());
        }
    }
}

fn apply(
    controller: &mut ModeController,
    command: Command,
    display: &mut Display,
) -> Result<bool, DisplayError> {
    let surface = &mut display.surface;
    match command {
        Command::Pixels(pixels) => Ok(controller.show_pixels(&pixels, surface)),
        Command::SetMode(mode) => controller.handle(Event::Select(mode), surface),
        Command::Text(text) => controller.set_text(&text, surface),
        Command::Time(time) => controller.set_time(time, surface),
        Command::Solar(stats) => controller.set_solar(stats, surface),
        Command::ClientConnected => controller.handle(Event::ClientConnected, surface),
        Command::ClientDisconnected => controller.handle(Event::ClientDisconnected, surface),
        Command::Angle(reading) => controller.push_angle(reading, surface),
    }
}

/// Push a redrawn surface, or hand it to the scroll task
fn finish(result: Result<bool, DisplayError>, display: &mut Display) {
    match result {
        Ok(true) if display.surface.is_scrolling() => SCROLL_WAKE.signal(()),
        Ok(true) => display.present(),
        Ok(false) => {}
        Err(e) => warn!("Display update failed: {:?}", e),
    }
}
