//! Scroll task
//!
//! Drives the scroll session of the shared surface. Each tick runs under
//! the display lock, then the task sleeps for the session interval with
//! the lock released. Without a session it parks until woken.

use defmt::*;
use embassy_time::Timer;

use crate::channels::SCROLL_WAKE;
use crate::display::DisplayMutex;

#[embassy_executor::task]
pub async fn scroll_task(display: &'static DisplayMutex) {
    info!("Scroll task started");

    loop {
        let interval = {
            let mut display = display.lock().await;
            if display.scroll_tick() {
                display.surface.scroll_interval()
            } else {
                None
            }
        };

        match interval {
            Some(ms) => Timer::after_millis(ms as u64).await,
            None => {
                trace!("No scroll session, waiting");
                SCROLL_WAKE.wait().await;
            }
        }
    }
}
