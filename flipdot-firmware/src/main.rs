//! Flipdot - flip-dot display firmware
//!
//! Drives a 14x28 flip-dot panel over RS-485 from an RP2040 and talks to a
//! host bridge over a second UART. The host supplies remote frames, scroll
//! text, wall-clock time, solar statistics and angle sensor readings.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, Uart, UartTx};
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use core::sync::atomic::Ordering;

use flipdot_core::config::FlipdotConfig;
use flipdot_display::PanelDriver;
use flipdot_hal_rp2040::uart::embassy_config;
use flipdot_hal_rp2040::{DriverEnable, PanelUart, Rs485Tx, UartConfig};

use crate::channels::FRAMES_SENT;
use crate::display::{Display, DisplayMutex};

/// Embedded configuration (compiled into firmware)
/// Edit flipdot.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../flipdot.toml");

mod channels;
mod config;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Host link buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

static CONFIG: StaticCell<FlipdotConfig> = StaticCell::new();
static DISPLAY: StaticCell<DisplayMutex> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Flipdot firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static FlipdotConfig = CONFIG.init(config::load(EMBEDDED_CONFIG));
    config::check_wiring(config);

    // Panel line: UART0 TX on GPIO0, transmit only
    let panel_uart_config = embassy_config(&UartConfig::with_baudrate(config.panel.baud_rate));
    let panel_tx = UartTx::new_blocking(p.UART0, p.PIN_0, panel_uart_config);

    // Transceiver driver enable on GPIO2, if the board has one
    let driver_enable = config
        .panel
        .de_pin
        .map(|_| DriverEnable::new(Output::new(p.PIN_2, Level::Low)));

    let panel = PanelDriver::new(
        Rs485Tx::new(PanelUart::new(panel_tx), driver_enable),
        config.panel.retries,
    );
    let mut display = Display::new(panel);
    display.blank_panel();
    let display: &'static DisplayMutex = DISPLAY.init(Mutex::new(display));
    info!("Panel initialized at {} baud", config.panel.baud_rate);

    // Host link: UART1 on GPIO4/5
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let host_uart_config = embassy_config(&UartConfig::with_baudrate(config.host.baud_rate));
    let uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, host_uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Host link initialized at {} baud", config.host.baud_rate);

    // Spawn tasks
    spawner.spawn(tasks::host_rx_task(rx)).unwrap();
    spawner.spawn(tasks::host_tx_task(tx)).unwrap();
    spawner.spawn(tasks::scroll_task(display)).unwrap();
    spawner.spawn(tasks::controller_task(display, config)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        info!("Heartbeat: {} panel updates sent", FRAMES_SENT.load(Ordering::Relaxed));
    }
}
