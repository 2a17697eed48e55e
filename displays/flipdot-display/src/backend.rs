//! Panel driver
//!
//! Encodes a framebuffer into the two board frames and pushes them out
//! through any [`UartTx`].

use flipdot_hal::UartTx;
use flipdot_protocol::{encode, FramePair, PanelFrame, PixelSource, ALL_BRIGHT, ALL_DARK};

/// Drawing and scroll-session errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Coordinates or glyph outside the surface
    OutOfBounds,
    /// A scroll session is already active
    AlreadyRunning,
    /// Scroll text does not fit the session buffer
    TextTooLong,
    /// Scroll interval of zero
    InvalidInterval,
    /// Bitmap shorter than its stated dimensions
    InvalidBitmap,
}

/// Failure to put a frame on the wire
///
/// Both variants are retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError<E> {
    /// The UART accepted fewer bytes than the frame holds
    ShortWrite { written: usize, expected: usize },
    /// The UART reported an error
    Io(E),
}

/// Default number of resends after a failed update
pub const DEFAULT_RETRIES: u8 = 3;

/// Sends framebuffers to the two panel boards
pub struct PanelDriver<T> {
    tx: T,
    retries: u8,
}

impl<T: UartTx> PanelDriver<T> {
    /// `retries` extra attempts are made after a failed send
    pub fn new(tx: T, retries: u8) -> Self {
        Self { tx, retries }
    }

    /// Encode and send a full display update
    pub fn show<P: PixelSource + ?Sized>(
        &mut self,
        pixels: &P,
    ) -> Result<(), TransportError<T::Error>> {
        self.send_pair(&encode(pixels))
    }

    /// Send top then bottom; any failure resends both
    pub fn send_pair(&mut self, pair: &FramePair) -> Result<(), TransportError<T::Error>> {
        self.with_retries(|tx| {
            for frame in pair.iter() {
                write_frame(tx, frame)?;
            }
            tx.flush().map_err(TransportError::Io)
        })
    }

    /// Flip every dot on every board to lit
    pub fn all_on(&mut self) -> Result<(), TransportError<T::Error>> {
        self.send_broadcast(&ALL_BRIGHT)
    }

    /// Flip every dot on every board to dark
    pub fn all_off(&mut self) -> Result<(), TransportError<T::Error>> {
        self.send_broadcast(&ALL_DARK)
    }

    fn send_broadcast(&mut self, frame: &PanelFrame) -> Result<(), TransportError<T::Error>> {
        self.with_retries(|tx| {
            write_frame(tx, frame)?;
            tx.flush().map_err(TransportError::Io)
        })
    }

    fn with_retries<F>(&mut self, mut attempt: F) -> Result<(), TransportError<T::Error>>
    where
        F: FnMut(&mut T) -> Result<(), TransportError<T::Error>>,
    {
        let mut result = attempt(&mut self.tx);
        for _ in 0..self.retries {
            if result.is_ok() {
                break;
            }
            result = attempt(&mut self.tx);
        }
        result
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// Give back the transmitter
    pub fn release(self) -> T {
        self.tx
    }
}

fn write_frame<T: UartTx>(tx: &mut T, frame: &PanelFrame) -> Result<(), TransportError<T::Error>> {
    let bytes = frame.as_bytes();
    let written = tx.write(bytes).map_err(TransportError::Io)?;
    if written != bytes.len() {
        return Err(TransportError::ShortWrite {
            written,
            expected: bytes.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::Framebuffer;
    use flipdot_protocol::{PanelFrame, ADDR_BOTTOM, ADDR_TOP, PANEL_FRAME_LEN};
    use std::vec::Vec;

    /// Records writes; the first `short_writes` calls accept one byte less
    #[derive(Default)]
    struct MockUart {
        written: Vec<Vec<u8>>,
        short_writes: usize,
        io_errors: usize,
        flushes: usize,
    }

    impl UartTx for MockUart {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            if self.io_errors > 0 {
                self.io_errors -= 1;
                return Err(());
            }
            if self.short_writes > 0 {
                self.short_writes -= 1;
                return Ok(data.len() - 1);
            }
            self.written.push(data.to_vec());
            Ok(data.len())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_show_sends_top_then_bottom() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(0, 13, true).unwrap();

        let mut driver = PanelDriver::new(MockUart::default(), 0);
        driver.show(&fb).unwrap();

        let uart = driver.release();
        assert_eq!(uart.written.len(), 2);
        let top = PanelFrame::parse(&uart.written[0]).unwrap();
        let bottom = PanelFrame::parse(&uart.written[1]).unwrap();
        assert_eq!(top.address(), ADDR_TOP);
        assert_eq!(bottom.address(), ADDR_BOTTOM);
        assert_eq!(bottom.columns()[0], 0b0100_0000);
        assert_eq!(uart.flushes, 1);
    }

    #[test]
    fn test_short_write_retries_whole_pair() {
        let uart = MockUart {
            short_writes: 1,
            ..Default::default()
        };
        let mut driver = PanelDriver::new(uart, 2);
        driver.show(&Framebuffer::new()).unwrap();

        // first attempt failed on the top frame, second sent both
        let uart = driver.release();
        assert_eq!(uart.written.len(), 2);
        assert_eq!(PanelFrame::parse(&uart.written[0]).unwrap().address(), ADDR_TOP);
    }

    #[test]
    fn test_gives_up_after_retries() {
        let uart = MockUart {
            short_writes: 10,
            ..Default::default()
        };
        let mut driver = PanelDriver::new(uart, 2);
        assert_eq!(
            driver.show(&Framebuffer::new()),
            Err(TransportError::ShortWrite {
                written: PANEL_FRAME_LEN - 1,
                expected: PANEL_FRAME_LEN
            })
        );
        // one attempt plus two retries
        assert_eq!(driver.release().short_writes, 7);
    }

    #[test]
    fn test_io_error_is_reported() {
        let uart = MockUart {
            io_errors: 5,
            ..Default::default()
        };
        let mut driver = PanelDriver::new(uart, 1);
        assert_eq!(driver.all_on(), Err(TransportError::Io(())));
    }

    #[test]
    fn test_all_on_all_off() {
        let mut driver = PanelDriver::new(MockUart::default(), DEFAULT_RETRIES);
        driver.all_on().unwrap();
        driver.all_off().unwrap();

        let uart = driver.release();
        assert_eq!(uart.written, [ALL_BRIGHT.as_bytes().to_vec(), ALL_DARK.as_bytes().to_vec()]);
    }
}
