//! Half-duplex RS-485 transmitter
//!
//! RS-485 transceivers need their driver-enable (DE) line asserted while
//! bytes are on the wire and released afterwards. Boards that tie DE high
//! in hardware pass `None`.

use crate::gpio::OutputPin;
use crate::uart::UartTx;

/// UART plus optional driver-enable pin
pub struct Rs485Tx<T, P> {
    uart: T,
    driver_enable: Option<P>,
}

impl<T: UartTx, P: OutputPin> Rs485Tx<T, P> {
    /// Wrap a UART, leaving the driver disabled
    pub fn new(uart: T, mut driver_enable: Option<P>) -> Self {
        if let Some(de) = driver_enable.as_mut() {
            de.set_low();
        }
        Self {
            uart,
            driver_enable,
        }
    }

    /// Give the parts back
    pub fn release(self) -> (T, Option<P>) {
        (self.uart, self.driver_enable)
    }
}

impl<T: UartTx, P: OutputPin> UartTx for Rs485Tx<T, P> {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if let Some(de) = self.driver_enable.as_mut() {
            de.set_high();
        }

        // DE must stay asserted until the last stop bit is out.
        let result = self
            .uart
            .write(data)
            .and_then(|written| self.uart.flush().map(|()| written));

        if let Some(de) = self.driver_enable.as_mut() {
            de.set_low();
        }
        result
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        High,
        Low,
        Write(usize),
        Flush,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockUart {
        log: Log,
        fail: bool,
    }

    impl UartTx for MockUart {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            self.log.borrow_mut().push(Event::Write(data.len()));
            if self.fail {
                Err(())
            } else {
                Ok(data.len())
            }
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.log.borrow_mut().push(Event::Flush);
            Ok(())
        }
    }

    struct MockPin {
        log: Log,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.log.borrow_mut().push(Event::High);
        }

        fn set_low(&mut self) {
            self.log.borrow_mut().push(Event::Low);
        }
    }

    fn setup(fail: bool) -> (Rs485Tx<MockUart, MockPin>, Log) {
        let log: Log = Rc::default();
        let uart = MockUart {
            log: log.clone(),
            fail,
        };
        let pin = MockPin { log: log.clone() };
        let tx = Rs485Tx::new(uart, Some(pin));
        log.borrow_mut().clear();
        (tx, log)
    }

    #[test]
    fn test_driver_enable_wraps_write() {
        let (mut tx, log) = setup(false);
        assert_eq!(tx.write(&[0u8; 32]), Ok(32));
        assert_eq!(
            *log.borrow(),
            [Event::High, Event::Write(32), Event::Flush, Event::Low]
        );
    }

    #[test]
    fn test_driver_released_on_error() {
        let (mut tx, log) = setup(true);
        assert_eq!(tx.write(&[0u8; 4]), Err(()));
        assert_eq!(log.borrow().last(), Some(&Event::Low));
    }

    #[test]
    fn test_without_driver_enable_pin() {
        let log: Log = Rc::default();
        let uart = MockUart {
            log: log.clone(),
            fail: false,
        };
        let mut tx: Rs485Tx<MockUart, MockPin> = Rs485Tx::new(uart, None);
        assert_eq!(tx.write(b"abc"), Ok(3));
        assert_eq!(*log.borrow(), [Event::Write(3), Event::Flush]);
    }
}
