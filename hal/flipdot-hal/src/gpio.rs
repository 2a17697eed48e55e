//! Output pin abstraction for the RS-485 driver-enable line

/// Push-pull output
///
/// The transceiver drives the bus while the pin is high and listens while
/// it is low.
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);
}
