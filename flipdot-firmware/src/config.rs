//! Configuration loading
//!
//! The configuration is compiled in from `flipdot.toml`. UART pins are
//! fixed by the board, so the pin entries are only checked against the
//! wiring.

use defmt::*;

use flipdot_core::config::{parse_config, FlipdotConfig};
use flipdot_hal_rp2040::uart::gpio_to_uart;
use flipdot_hal_rp2040::{PinRole, UartId, UartPin};

/// Board wiring
pub const PANEL_TX_PIN: u8 = 0;
pub const PANEL_DE_PIN: u8 = 2;
pub const HOST_TX_PIN: u8 = 4;
pub const HOST_RX_PIN: u8 = 5;

/// Parse the embedded configuration, falling back to defaults
pub fn load(source: &str) -> FlipdotConfig {
    match parse_config(source) {
        Ok(config) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            error!("Invalid configuration ({:?}), using built-in defaults", e);
            FlipdotConfig::default()
        }
    }
}

/// Warn about configured pins that differ from the board wiring
pub fn check_wiring(config: &FlipdotConfig) {
    let expected = [
        ("panel.tx_pin", config.panel.tx_pin, PANEL_TX_PIN, UartId::Uart0, PinRole::Tx),
        ("host.tx_pin", config.host.tx_pin, HOST_TX_PIN, UartId::Uart1, PinRole::Tx),
        ("host.rx_pin", config.host.rx_pin, HOST_RX_PIN, UartId::Uart1, PinRole::Rx),
    ];

    for (name, configured, wired, uart, role) in expected {
        if gpio_to_uart(configured) != Some(UartPin { uart, role }) {
            warn!("{} = gpio{} is not a {:?} {:?} pin", name, configured, uart, role);
        } else if configured != wired {
            warn!("{} = gpio{} but the board uses gpio{}", name, configured, wired);
        }
    }

    if let Some(de) = config.panel.de_pin {
        if de != PANEL_DE_PIN {
            warn!("panel.de_pin = gpio{} but the board uses gpio{}", de, PANEL_DE_PIN);
        }
    }
}
