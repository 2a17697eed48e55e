//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! The display itself is shared through one mutex.

pub mod controller;
pub mod host_rx;
pub mod host_tx;
pub mod scroll;

pub use controller::controller_task;
pub use host_rx::host_rx_task;
pub use host_tx::host_tx_task;
pub use scroll::scroll_task;
