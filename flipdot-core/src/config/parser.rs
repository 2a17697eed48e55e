//! Minimal TOML parser for `flipdot.toml`
//!
//! Handles only the subset the configuration needs:
//! - `[section]` headers
//! - `key = value` pairs with string, integer and boolean values
//! - `#` comments, including trailing ones
//!
//! Unknown keys are ignored so newer files still load on older firmware.

use heapless::String;

use flipdot_protocol::Mode;

use super::types::{FlipdotConfig, FontChoice, MAX_ANGLE_SAMPLES};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value of the wrong type or out of range
    InvalidValue,
    /// String longer than its fixed capacity
    TooManyItems,
    /// Pin not in `gpioNN` form
    InvalidPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Panel,
    Host,
    Angle,
    Modes,
    Scroll,
}

/// Parse a configuration file, starting from the defaults
pub fn parse_config(input: &str) -> Result<FlipdotConfig, ParseError> {
    let mut config = FlipdotConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = line
                .split('#')
                .next()
                .map(str::trim)
                .and_then(|h| h.strip_prefix('['))
                .and_then(|h| h.strip_suffix(']'))
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header.trim())?;
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            return Err(ParseError::InvalidValue);
        };
        apply_value(section, key, value, &mut config)?;
    }

    validate(&config)?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header {
        "panel" => Ok(Section::Panel),
        "host" => Ok(Section::Host),
        "angle" => Ok(Section::Angle),
        "modes" => Ok(Section::Modes),
        "scroll" => Ok(Section::Scroll),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip surrounding quotes, allowing bare words
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio11"
fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let pin = parse_string(value)
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?;
    let pin: u8 = pin.parse().map_err(|_| ParseError::InvalidPin)?;
    // RP2040 exposes GPIO0-29
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }
    Ok(pin)
}

fn parse_mode(value: &str) -> Result<Mode, ParseError> {
    match parse_string(value) {
        "clock" => Ok(Mode::Clock),
        "scroll" => Ok(Mode::Scroll),
        "solar" => Ok(Mode::Solar),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_font(value: &str) -> Result<FontChoice, ParseError> {
    FontChoice::from_name(parse_string(value)).ok_or(ParseError::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FlipdotConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Panel, "tx_pin") => config.panel.tx_pin = parse_pin(value)?,
        (Section::Panel, "de_pin") => config.panel.de_pin = Some(parse_pin(value)?),
        (Section::Panel, "baud_rate") => config.panel.baud_rate = parse_int(value)?,
        (Section::Panel, "retries") => config.panel.retries = parse_int(value)?,

        (Section::Host, "tx_pin") => config.host.tx_pin = parse_pin(value)?,
        (Section::Host, "rx_pin") => config.host.rx_pin = parse_pin(value)?,
        (Section::Host, "baud_rate") => config.host.baud_rate = parse_int(value)?,

        (Section::Angle, "enabled") => config.angle.enabled = parse_bool(value)?,
        (Section::Angle, "samples") => config.angle.samples = parse_int(value)?,
        (Section::Angle, "azimuth_min") => config.angle.azimuth.min = parse_int(value)?,
        (Section::Angle, "azimuth_max") => config.angle.azimuth.max = parse_int(value)?,
        (Section::Angle, "elevation_min") => config.angle.elevation.min = parse_int(value)?,
        (Section::Angle, "elevation_max") => config.angle.elevation.max = parse_int(value)?,

        (Section::Modes, "default") => config.modes.default = parse_mode(value)?,
        (Section::Modes, "rotate") => config.modes.rotate = parse_bool(value)?,
        (Section::Modes, "rotate_s") => config.modes.rotate_s = parse_int(value)?,

        (Section::Scroll, "text") => {
            config.scroll.text =
                String::try_from(parse_string(value)).map_err(|_| ParseError::TooManyItems)?;
        }
        (Section::Scroll, "interval_ms") => config.scroll.interval_ms = parse_int(value)?,
        (Section::Scroll, "font") => config.scroll.font = parse_font(value)?,
        (Section::Scroll, "y") => config.scroll.y = parse_int(value)?,

        _ => {}
    }
    Ok(())
}

/// Cross-field checks the line parser cannot do
fn validate(config: &FlipdotConfig) -> Result<(), ParseError> {
    let samples = config.angle.samples as usize;
    if samples == 0 || samples % 2 == 0 || samples > MAX_ANGLE_SAMPLES {
        return Err(ParseError::InvalidValue);
    }
    if config.angle.azimuth.min > config.angle.azimuth.max
        || config.angle.elevation.min > config.angle.elevation.max
    {
        return Err(ParseError::InvalidValue);
    }
    if config.modes.rotate_s == 0 || config.scroll.interval_ms == 0 {
        return Err(ParseError::InvalidValue);
    }
    if config.panel.baud_rate == 0 || config.host.baud_rate == 0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(())
}
