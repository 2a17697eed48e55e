//! Display modes selectable from the host bridge

/// What the display is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Wall clock
    #[default]
    Clock,
    /// Scrolling text
    Scroll,
    /// Solar production statistics
    Solar,
    /// Pixels pushed by a remote client
    Remote,
    /// Single dot following the angle sensor
    Angle,
}

// Wire format values
const MODE_CLOCK: u8 = 0x00;
const MODE_SCROLL: u8 = 0x01;
const MODE_SOLAR: u8 = 0x02;
const MODE_REMOTE: u8 = 0x03;
const MODE_ANGLE: u8 = 0x04;

impl Mode {
    /// Parse a mode from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MODE_CLOCK => Some(Mode::Clock),
            MODE_SCROLL => Some(Mode::Scroll),
            MODE_SOLAR => Some(Mode::Solar),
            MODE_REMOTE => Some(Mode::Remote),
            MODE_ANGLE => Some(Mode::Angle),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Mode::Clock => MODE_CLOCK,
            Mode::Scroll => MODE_SCROLL,
            Mode::Solar => MODE_SOLAR,
            Mode::Remote => MODE_REMOTE,
            Mode::Angle => MODE_ANGLE,
        }
    }

    /// Modes the periodic rotation cycles through
    pub fn is_rotating(&self) -> bool {
        matches!(self, Mode::Clock | Mode::Scroll | Mode::Solar)
    }
}
