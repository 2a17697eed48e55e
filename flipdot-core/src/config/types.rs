//! Configuration type definitions

use heapless::String;

use flipdot_display::fonts::{FONT_3X5, FONT_5X7, FONT_5X7_MONO};
use flipdot_display::{Font, MAX_SCROLL_TEXT};
use flipdot_protocol::Mode;

/// Largest accepted angle filter window
pub const MAX_ANGLE_SAMPLES: usize = 9;

/// RS-485 link to the panel boards
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// UART TX GPIO
    pub tx_pin: u8,
    /// RS-485 driver-enable GPIO, if the transceiver needs one
    pub de_pin: Option<u8>,
    pub baud_rate: u32,
    /// Resends of a failed update
    pub retries: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            tx_pin: 0,
            de_pin: None,
            baud_rate: 57_600,
            retries: 3,
        }
    }
}

/// UART link to the host bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostConfig {
    pub tx_pin: u8,
    pub rx_pin: u8,
    pub baud_rate: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tx_pin: 4,
            rx_pin: 5,
            baud_rate: 115_200,
        }
    }
}

/// Inclusive range of sensor degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DegreeRange {
    pub min: i16,
    pub max: i16,
}

impl DegreeRange {
    pub const fn new(min: i16, max: i16) -> Self {
        Self { min, max }
    }

    /// Number of whole degrees covered
    pub fn span(&self) -> u32 {
        (self.max as i32 - self.min as i32 + 1).max(1) as u32
    }

    pub fn clamp(&self, value: i16) -> i16 {
        value.clamp(self.min, self.max.max(self.min))
    }
}

/// Angle sensor settings
///
/// Readings are forwarded by the host bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngleConfig {
    pub enabled: bool,
    /// Median window, odd and at most [`MAX_ANGLE_SAMPLES`]
    pub samples: u8,
    pub azimuth: DegreeRange,
    pub elevation: DegreeRange,
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            samples: 5,
            azimuth: DegreeRange::new(0, 359),
            elevation: DegreeRange::new(0, 90),
        }
    }
}

/// Mode selection and rotation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModesConfig {
    /// Mode shown at boot and after a remote client leaves
    pub default: Mode,
    /// Cycle clock, scroll and solar
    pub rotate: bool,
    /// Seconds per rotation step
    pub rotate_s: u16,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            default: Mode::Clock,
            rotate: true,
            rotate_s: 30,
        }
    }
}

/// Built-in font selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontChoice {
    #[default]
    Small,
    Regular,
    Mono,
}

impl FontChoice {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "3x5" => Some(FontChoice::Small),
            "5x7" => Some(FontChoice::Regular),
            "5x7_mono" => Some(FontChoice::Mono),
            _ => None,
        }
    }

    pub fn font(self) -> &'static Font {
        match self {
            FontChoice::Small => &FONT_3X5,
            FontChoice::Regular => &FONT_5X7,
            FontChoice::Mono => &FONT_5X7_MONO,
        }
    }
}

/// Scrolling text mode
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollConfig {
    /// Text shown until the host sends another
    pub text: String<MAX_SCROLL_TEXT>,
    pub interval_ms: u32,
    pub font: FontChoice,
    /// Top row of the text
    pub y: u8,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            text: String::try_from("HELLO").unwrap_or_default(),
            interval_ms: 150,
            font: FontChoice::Small,
            y: 4,
        }
    }
}

/// Complete display configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlipdotConfig {
    pub panel: PanelConfig,
    pub host: HostConfig,
    pub angle: AngleConfig,
    pub modes: ModesConfig,
    pub scroll: ScrollConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlipdotConfig::default();
        assert_eq!(config.panel.baud_rate, 57_600);
        assert_eq!(config.panel.retries, 3);
        assert_eq!(config.host.baud_rate, 115_200);
        assert_eq!(config.angle.samples, 5);
        assert_eq!(config.modes.default, Mode::Clock);
        assert_eq!(config.scroll.interval_ms, 150);
        assert_eq!(config.scroll.text.as_str(), "HELLO");
    }

    #[test]
    fn test_degree_range() {
        let range = DegreeRange::new(0, 359);
        assert_eq!(range.span(), 360);
        assert_eq!(range.clamp(-5), 0);
        assert_eq!(range.clamp(400), 359);
    }

    #[test]
    fn test_font_choice() {
        assert_eq!(FontChoice::from_name("5x7"), Some(FontChoice::Regular));
        assert!(FontChoice::from_name("big").is_none());
        assert_eq!(FontChoice::Mono.font(), &FONT_5X7_MONO);
    }
}
