//! GPIO wrappers implementing `flipdot_hal::OutputPin`

use embassy_rp::gpio::Output;

/// RS-485 driver-enable line
pub struct DriverEnable<'d> {
    pin: Output<'d>,
}

impl<'d> DriverEnable<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl flipdot_hal::OutputPin for DriverEnable<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}
