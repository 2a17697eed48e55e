//! Host link framing.
//!
//! The host bridge and the firmware exchange small typed messages over a
//! UART. Every message travels in one frame:
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 0xAA  │ 1B     │ 1B   │ 0-250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! CHECKSUM is the XOR of LENGTH, TYPE and every payload byte.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// START + LENGTH + TYPE + CHECKSUM
const FRAME_OVERHEAD: usize = 4;

/// Largest encoded frame
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors raised while building, encoding or decoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Frame is incomplete (need more bytes)
    Incomplete,
    /// Structurally valid frame with unusable content
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Input has the wrong number of bytes
    InvalidLength,
    /// Panel frame start/end markers are wrong
    InvalidMarker,
    /// Panel frame addressed to an unknown board
    InvalidAddress,
}

/// A parsed or constructed host link frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame carrying `payload`
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, &b| acc ^ b)
    }

    /// Number of bytes [`Frame::encode`] will write
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        let out = buffer
            .get_mut(..frame_len)
            .ok_or(FrameError::BufferTooSmall)?;

        let length = self.payload.len() as u8;
        let payload_end = 3 + self.payload.len();

        out[0] = FRAME_START;
        out[1] = length;
        out[2] = self.msg_type;
        out[3..payload_end].copy_from_slice(&self.payload);
        out[payload_end] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(frame_len)
    }

    /// Encode into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    Length,
    Type,
    Payload,
    Checksum,
}

/// Byte-at-a-time frame decoder
///
/// Bytes outside a frame are skipped until the next START byte, so the
/// parser resynchronises on its own after line noise or a dropped byte.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    msg_type: u8,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            state: ParseState::Start,
            buffer: Vec::new(),
            expected_length: 0,
            msg_type: 0,
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::Start;
        self.buffer.clear();
        self.expected_length = 0;
        self.msg_type = 0;
    }

    /// Returns true while a frame is partially received
    pub fn in_frame(&self) -> bool {
        self.state != ParseState::Start
    }

    /// Feed one byte
    ///
    /// `Ok(Some(frame))` on a complete valid frame, `Ok(None)` when more
    /// bytes are needed. Errors reset the parser.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Start => {
                if byte == FRAME_START {
                    self.state = ParseState::Length;
                }
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                self.expected_length = byte;
                self.state = ParseState::Type;
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.buffer.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
            }
            ParseState::Payload => {
                if self.buffer.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                let expected = Frame::checksum(self.expected_length, self.msg_type, &self.buffer);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }

                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.buffer),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Decode every frame in `bytes`
    ///
    /// The iterator consumes the whole slice; a partial frame at the end is
    /// kept in the parser for the next call.
    pub fn frames<'p, 'b>(&'p mut self, bytes: &'b [u8]) -> Frames<'p, 'b> {
        Frames {
            parser: self,
            bytes: bytes.iter(),
        }
    }
}

/// Iterator returned by [`FrameParser::frames`]
pub struct Frames<'p, 'b> {
    parser: &'p mut FrameParser,
    bytes: core::slice::Iter<'b, u8>,
}

impl Iterator for Frames<'_, '_> {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.parser.feed(byte) {
                Ok(Some(frame)) => return Some(Ok(frame)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(0x06);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(buffer[..4], [FRAME_START, 0, 0x06, 0x06]);
    }

    #[test]
    fn test_frame_encode_buffer_too_small() {
        let frame = Frame::new(0x03, b"HELLO").unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_frame_roundtrip() {
        let original = Frame::new(0x03, b"FLIP").unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let parsed: std::vec::Vec<_> = parser.frames(&encoded).collect();

        assert_eq!(parsed, [Ok(original)]);
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let mut encoded = Frame::empty(0x06).encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let mut parser = FrameParser::new();
        let results: std::vec::Vec<_> = parser.frames(&encoded).collect();
        assert_eq!(results, [Err(FrameError::InvalidChecksum)]);
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let encoded = Frame::empty(0x06).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 20>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x12, 0x34]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let mut parser = FrameParser::new();
        let frame = parser.frames(&data).next().unwrap().unwrap();
        assert_eq!(frame.msg_type, 0x06);
    }

    #[test]
    fn test_parser_multiple_frames_and_split_input() {
        let a = Frame::new(0x02, &[1]).unwrap().encode_to_vec().unwrap();
        let b = Frame::new(0x03, b"HI").unwrap().encode_to_vec().unwrap();

        let mut stream = std::vec::Vec::new();
        stream.extend_from_slice(&a);
        stream.extend_from_slice(&b);

        let (head, tail) = stream.split_at(a.len() + 2);
        let mut parser = FrameParser::new();

        let first: std::vec::Vec<_> = parser.frames(head).collect();
        assert_eq!(first.len(), 1);
        assert!(parser.in_frame());

        let second: std::vec::Vec<_> = parser.frames(tail).collect();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].as_ref().unwrap().payload.as_slice(), b"HI");
    }

    #[test]
    fn test_parser_rejects_oversized_length() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(FRAME_START), Ok(None));
        assert_eq!(parser.feed(251), Err(FrameError::InvalidFrame));
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Frame::new(0x03, &large_payload),
            Err(FrameError::PayloadTooLarge)
        );
    }
}
