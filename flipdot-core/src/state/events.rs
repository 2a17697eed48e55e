//! Events that trigger mode transitions

use flipdot_protocol::Mode;

/// Events that can change the displayed mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A remote client opened its connection to the host bridge
    ClientConnected,
    /// The remote client went away
    ClientDisconnected,
    /// Explicit mode request from the host
    Select(Mode),
    /// Rotation timer fired
    Rotate,
}
