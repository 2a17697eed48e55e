//! Inter-task communication channels
//!
//! Host messages arrive on the RX task and are queued for the controller
//! as owned [`Command`]s; replies go back out through the TX task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;
use portable_atomic::AtomicU32;

use flipdot_display::MAX_SCROLL_TEXT;
use flipdot_protocol::{AngleReading, DisplayReply, Mode, PackedPixels, SolarStats, WallTime};

/// Channel capacity for host commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for replies to the host
const REPLY_CHANNEL_SIZE: usize = 8;

/// Work for the controller task
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Pixels(PackedPixels),
    SetMode(Mode),
    Text(String<MAX_SCROLL_TEXT>),
    Time(WallTime),
    Solar(SolarStats),
    ClientConnected,
    ClientDisconnected,
    Angle(AngleReading),
}

/// Host commands for the controller
pub static COMMANDS: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Replies for the host TX task
pub static REPLIES: Channel<CriticalSectionRawMutex, DisplayReply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// A scroll session was started; wakes the idle scroll task
pub static SCROLL_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Panel updates sent since boot
pub static FRAMES_SENT: AtomicU32 = AtomicU32::new(0);
