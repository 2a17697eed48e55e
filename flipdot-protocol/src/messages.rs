//! Host link message types
//!
//! - Host → Display: pixels, mode and content updates, heartbeat
//! - Display → Host: heartbeat response and per-message acknowledgement

use crate::frame::{Frame, FrameError};
use crate::mode::Mode;
use crate::panel::{PixelSource, PANEL_COLS, PANEL_ROWS, PIXEL_COUNT};

// Message type IDs: Host → Display
pub const MSG_PIXELS: u8 = 0x01;
pub const MSG_MODE: u8 = 0x02;
pub const MSG_TEXT: u8 = 0x03;
pub const MSG_TIME: u8 = 0x04;
pub const MSG_SOLAR: u8 = 0x05;
pub const MSG_PING: u8 = 0x06;
pub const MSG_CONNECTED: u8 = 0x07;
pub const MSG_DISCONNECTED: u8 = 0x08;
pub const MSG_ANGLE: u8 = 0x09;

// Message type IDs: Display → Host
pub const MSG_PONG: u8 = 0x20;
pub const MSG_ACK: u8 = 0x21;
pub const MSG_NACK: u8 = 0x22;

/// Bytes needed for a full display at one bit per cell
pub const PACKED_PIXELS_LEN: usize = PIXEL_COUNT.div_ceil(8);

/// Full display bit-packed row-major, most significant bit first
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedPixels(pub [u8; PACKED_PIXELS_LEN]);

impl PackedPixels {
    /// Pack any pixel source
    pub fn from_source<P: PixelSource + ?Sized>(pixels: &P) -> Self {
        let mut packed = [0u8; PACKED_PIXELS_LEN];
        for row in 0..PANEL_ROWS {
            for col in 0..PANEL_COLS {
                if pixels.is_lit(row, col) {
                    let index = row * PANEL_COLS + col;
                    packed[index / 8] |= 0x80 >> (index % 8);
                }
            }
        }
        Self(packed)
    }
}

impl PixelSource for PackedPixels {
    fn is_lit(&self, row: usize, col: usize) -> bool {
        let index = row * PANEL_COLS + col;
        self.0[index / 8] & (0x80 >> (index % 8)) != 0
    }
}

/// Wall clock time pushed by the host (the host owns SNTP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallTime {
    /// Build a time, rejecting out-of-range fields
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        (hour < 24 && minute < 60 && second < 60).then_some(Self {
            hour,
            minute,
            second,
        })
    }

    /// Seconds since midnight
    pub fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Time `seconds` later, wrapping at midnight
    pub fn advanced_by(&self, seconds: u32) -> Self {
        let total = (self.seconds_of_day() + seconds % 86_400) % 86_400;
        Self {
            hour: (total / 3600) as u8,
            minute: (total / 60 % 60) as u8,
            second: (total % 60) as u8,
        }
    }
}

/// Solar production figures polled by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SolarStats {
    /// Current production in watts
    pub power_w: u16,
    /// Energy produced since midnight in watt-hours
    pub energy_today_wh: u32,
}

/// Raw angle sensor sample, -1 when the sensor omitted a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngleReading {
    pub azimuth: i16,
    pub elevation: i16,
}

/// Messages from the host bridge to the display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage<'a> {
    /// Replace the whole display (remote mode)
    Pixels(PackedPixels),
    /// Switch display mode
    SetMode(Mode),
    /// Replace the scroll text
    Text(&'a str),
    /// Set the wall clock
    Time(WallTime),
    /// Latest solar statistics
    Solar(SolarStats),
    /// Heartbeat request
    Ping,
    /// A remote client opened its session
    ClientConnected,
    /// The remote client went away
    ClientDisconnected,
    /// Angle sensor sample relayed by the host
    Angle(AngleReading),
}

impl<'a> HostMessage<'a> {
    /// Parse a message from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_PIXELS => {
                let packed = payload.try_into().map_err(|_| FrameError::InvalidLength)?;
                Ok(HostMessage::Pixels(PackedPixels(packed)))
            }
            MSG_MODE => match payload {
                [byte] => Mode::from_byte(*byte)
                    .map(HostMessage::SetMode)
                    .ok_or(FrameError::InvalidFrame),
                _ => Err(FrameError::InvalidLength),
            },
            MSG_TEXT => core::str::from_utf8(payload)
                .map(HostMessage::Text)
                .map_err(|_| FrameError::InvalidFrame),
            MSG_TIME => match payload {
                [hour, minute, second] => WallTime::new(*hour, *minute, *second)
                    .map(HostMessage::Time)
                    .ok_or(FrameError::InvalidFrame),
                _ => Err(FrameError::InvalidLength),
            },
            MSG_SOLAR => match payload {
                [p0, p1, e0, e1, e2, e3] => Ok(HostMessage::Solar(SolarStats {
                    power_w: u16::from_le_bytes([*p0, *p1]),
                    energy_today_wh: u32::from_le_bytes([*e0, *e1, *e2, *e3]),
                })),
                _ => Err(FrameError::InvalidLength),
            },
            MSG_PING => Ok(HostMessage::Ping),
            MSG_CONNECTED => Ok(HostMessage::ClientConnected),
            MSG_DISCONNECTED => Ok(HostMessage::ClientDisconnected),
            MSG_ANGLE => match payload {
                [a0, a1, e0, e1] => Ok(HostMessage::Angle(AngleReading {
                    azimuth: i16::from_le_bytes([*a0, *a1]),
                    elevation: i16::from_le_bytes([*e0, *e1]),
                })),
                _ => Err(FrameError::InvalidLength),
            },
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Message type byte on the wire
    pub fn msg_type(&self) -> u8 {
        match self {
            HostMessage::Pixels(_) => MSG_PIXELS,
            HostMessage::SetMode(_) => MSG_MODE,
            HostMessage::Text(_) => MSG_TEXT,
            HostMessage::Time(_) => MSG_TIME,
            HostMessage::Solar(_) => MSG_SOLAR,
            HostMessage::Ping => MSG_PING,
            HostMessage::ClientConnected => MSG_CONNECTED,
            HostMessage::ClientDisconnected => MSG_DISCONNECTED,
            HostMessage::Angle(_) => MSG_ANGLE,
        }
    }

    /// Encode this message into a frame (host side, tests and tooling)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let msg_type = self.msg_type();
        match self {
            HostMessage::Pixels(packed) => Frame::new(msg_type, &packed.0),
            HostMessage::SetMode(mode) => Frame::new(msg_type, &[mode.to_byte()]),
            HostMessage::Text(text) => Frame::new(msg_type, text.as_bytes()),
            HostMessage::Time(t) => Frame::new(msg_type, &[t.hour, t.minute, t.second]),
            HostMessage::Solar(stats) => {
                let mut payload = [0u8; 6];
                payload[..2].copy_from_slice(&stats.power_w.to_le_bytes());
                payload[2..].copy_from_slice(&stats.energy_today_wh.to_le_bytes());
                Frame::new(msg_type, &payload)
            }
            HostMessage::Angle(reading) => {
                let mut payload = [0u8; 4];
                payload[..2].copy_from_slice(&reading.azimuth.to_le_bytes());
                payload[2..].copy_from_slice(&reading.elevation.to_le_bytes());
                Frame::new(msg_type, &payload)
            }
            HostMessage::Ping | HostMessage::ClientConnected | HostMessage::ClientDisconnected => {
                Ok(Frame::empty(msg_type))
            }
        }
    }
}

/// Replies from the display to the host bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayReply {
    /// Heartbeat response
    Pong,
    /// Message applied
    Ack { msg_type: u8 },
    /// Message rejected (bad payload, display busy)
    Nack { msg_type: u8 },
}

impl DisplayReply {
    /// Encode this reply into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DisplayReply::Pong => Ok(Frame::empty(MSG_PONG)),
            DisplayReply::Ack { msg_type } => Frame::new(MSG_ACK, &[*msg_type]),
            DisplayReply::Nack { msg_type } => Frame::new(MSG_NACK, &[*msg_type]),
        }
    }

    /// Parse a reply (host side, tests and tooling)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match (frame.msg_type, frame.payload.as_slice()) {
            (MSG_PONG, []) => Ok(DisplayReply::Pong),
            (MSG_ACK, [msg_type]) => Ok(DisplayReply::Ack {
                msg_type: *msg_type,
            }),
            (MSG_NACK, [msg_type]) => Ok(DisplayReply::Nack {
                msg_type: *msg_type,
            }),
            (MSG_PONG | MSG_ACK | MSG_NACK, _) => Err(FrameError::InvalidLength),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::encode;

    #[test]
    fn test_packed_pixels_len() {
        assert_eq!(PACKED_PIXELS_LEN, 49);
    }

    #[test]
    fn test_packed_pixels_bit_order() {
        let mut grid = [[0u8; PANEL_COLS]; PANEL_ROWS];
        grid[0][0] = 1;
        grid[0][9] = 1;
        // cells 384 and 391: first and last bit of the final byte
        grid[13][20] = 1;
        grid[13][27] = 1;

        let packed = PackedPixels::from_source(&grid);
        assert_eq!(packed.0[0], 0x80);
        assert_eq!(packed.0[1], 0x40);
        assert_eq!(packed.0[48], 0x81);
        assert_eq!(encode(&packed), encode(&grid));
    }

    #[test]
    fn test_pixels_message() {
        let mut grid = [[0u8; PANEL_COLS]; PANEL_ROWS];
        grid[5][5] = 1;
        let msg = HostMessage::Pixels(PackedPixels::from_source(&grid));

        let frame = msg.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_PIXELS);
        assert_eq!(frame.payload.len(), PACKED_PIXELS_LEN);
        assert_eq!(HostMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_pixels_wrong_length() {
        let frame = Frame::new(MSG_PIXELS, &[0u8; 48]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::InvalidLength)
        );
    }

    #[test]
    fn test_text_message() {
        let frame = Frame::new(MSG_TEXT, b"HELLO WORLD").unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame).unwrap(),
            HostMessage::Text("HELLO WORLD")
        );

        let frame = Frame::new(MSG_TEXT, &[0xFF, 0xFE]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_mode_message() {
        let frame = Frame::new(MSG_MODE, &[0x02]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame).unwrap(),
            HostMessage::SetMode(Mode::Solar)
        );

        let frame = Frame::new(MSG_MODE, &[0x09]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_time_message_validates_fields() {
        let frame = Frame::new(MSG_TIME, &[23, 59, 30]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame).unwrap(),
            HostMessage::Time(WallTime::new(23, 59, 30).unwrap())
        );

        let frame = Frame::new(MSG_TIME, &[24, 0, 0]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_solar_and_angle_little_endian() {
        let solar = HostMessage::Solar(SolarStats {
            power_w: 1234,
            energy_today_wh: 56_789,
        });
        let frame = solar.to_frame().unwrap();
        assert_eq!(frame.payload[..2], [0xD2, 0x04]);
        assert_eq!(HostMessage::from_frame(&frame).unwrap(), solar);

        let angle = HostMessage::Angle(AngleReading {
            azimuth: 270,
            elevation: -1,
        });
        let frame = angle.to_frame().unwrap();
        assert_eq!(HostMessage::from_frame(&frame).unwrap(), angle);
    }

    #[test]
    fn test_wall_time_advance_wraps() {
        let t = WallTime::new(23, 59, 50).unwrap();
        assert_eq!(t.advanced_by(15), WallTime::new(0, 0, 5).unwrap());
        assert_eq!(t.advanced_by(86_400), t);
    }

    #[test]
    fn test_display_reply_roundtrip() {
        for reply in [
            DisplayReply::Pong,
            DisplayReply::Ack { msg_type: MSG_TEXT },
            DisplayReply::Nack { msg_type: MSG_PIXELS },
        ] {
            let frame = reply.to_frame().unwrap();
            assert_eq!(DisplayReply::from_frame(&frame), Ok(reply));
        }
    }

    #[test]
    fn test_unknown_message_type() {
        let frame = Frame::empty(0x7E);
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
        assert_eq!(
            DisplayReply::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }
}
