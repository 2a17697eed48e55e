//! UART support for RP2040
//!
//! The panel line is written with blocking transfers: a 32-byte frame
//! takes under 6 ms at 57600 baud and the scroll tick must not yield while
//! it holds the display lock.

use embassy_rp::uart::{self, Blocking};
use flipdot_hal::uart::{DataBits, Parity, StopBits};
use flipdot_hal::UartConfig;

/// RP2040 UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Direction of a UART pin function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    Tx,
    Rx,
}

/// UART function a GPIO can be muxed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartPin {
    pub uart: UartId,
    pub role: PinRole,
}

/// Determine which UART, and which direction, a given GPIO pin can serve
pub fn gpio_to_uart(gpio: u8) -> Option<UartPin> {
    // UART0: TX 0/12/16/28, RX 1/13/17/29
    // UART1: TX 4/8/20/24, RX 5/9/21/25
    let uart = match gpio {
        0 | 1 | 12 | 13 | 16 | 17 | 28 | 29 => UartId::Uart0,
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => UartId::Uart1,
        _ => return None,
    };
    let role = if gpio % 2 == 0 { PinRole::Tx } else { PinRole::Rx };
    Some(UartPin { uart, role })
}

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    Overrun,
    Break,
    Parity,
    Framing,
    Other,
}

impl From<uart::Error> for UartError {
    fn from(e: uart::Error) -> Self {
        match e {
            uart::Error::Overrun => UartError::Overrun,
            uart::Error::Break => UartError::Break,
            uart::Error::Parity => UartError::Parity,
            uart::Error::Framing => UartError::Framing,
            _ => UartError::Other,
        }
    }
}

/// Translate the board-agnostic config into embassy-rp's
pub fn embassy_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

/// Blocking transmitter for the panel line
pub struct PanelUart<'d> {
    tx: uart::UartTx<'d, Blocking>,
}

impl<'d> PanelUart<'d> {
    pub fn new(tx: uart::UartTx<'d, Blocking>) -> Self {
        Self { tx }
    }
}

impl flipdot_hal::UartTx for PanelUart<'_> {
    type Error = UartError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        // The blocking driver either queues everything or errors out.
        self.tx.blocking_write(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_to_uart_roles() {
        let pin = |uart, role| Some(UartPin { uart, role });

        assert_eq!(gpio_to_uart(0), pin(UartId::Uart0, PinRole::Tx));
        assert_eq!(gpio_to_uart(29), pin(UartId::Uart0, PinRole::Rx));
        assert_eq!(gpio_to_uart(4), pin(UartId::Uart1, PinRole::Tx));
        assert_eq!(gpio_to_uart(5), pin(UartId::Uart1, PinRole::Rx));
        assert_eq!(gpio_to_uart(24), pin(UartId::Uart1, PinRole::Tx));
    }

    #[test]
    fn test_gpio_without_uart() {
        for gpio in [2, 3, 6, 10, 14, 26, 30] {
            assert_eq!(gpio_to_uart(gpio), None);
        }
    }
}
