//! Panel frame encoding for the RS-485 flip-dot boards.
//!
//! The display is two physical boards stacked vertically, 7 rows each.
//! Each board takes one fixed-size frame:
//!
//! ```text
//! ┌──────┬──────┬─────────┬────────────────────────┬──────┐
//! │ 0x80 │ 0x83 │ ADDRESS │ 28 column bytes        │ 0x8F │
//! │ 1B   │ 1B   │ 1B      │ bit N = row N of board │ 1B   │
//! └──────┴──────┴─────────┴────────────────────────┴──────┘
//! ```
//!
//! Rows 0-6 go to the top board (0x15), rows 7-13 to the bottom board
//! (0x17). Bit 7 of a column byte is never set.

use crate::frame::FrameError;

/// Display height in dots
pub const PANEL_ROWS: usize = 14;

/// Display width in dots
pub const PANEL_COLS: usize = 28;

/// Rows driven by a single board
pub const BOARD_ROWS: usize = 7;

/// Cells in a full display
pub const PIXEL_COUNT: usize = PANEL_ROWS * PANEL_COLS;

/// Size of one board frame on the wire
pub const PANEL_FRAME_LEN: usize = 32;

/// First start marker
pub const FRAME_MARKER: u8 = 0x80;

/// Second start marker
pub const FRAME_COMMAND: u8 = 0x83;

/// End marker
pub const FRAME_END: u8 = 0x8F;

/// Address of the top board
pub const ADDR_TOP: u8 = 0x15;

/// Address of the bottom board
pub const ADDR_BOTTOM: u8 = 0x17;

/// Address every board listens to
pub const ADDR_BROADCAST: u8 = 0xFF;

const COLUMNS_START: usize = 3;
const COLUMNS_END: usize = COLUMNS_START + PANEL_COLS;

/// Column mask with every dot of a board lit
const COLUMN_ALL_LIT: u8 = 0x7F;

/// Every board, every dot dark
pub const ALL_DARK: PanelFrame = PanelFrame::filled(ADDR_BROADCAST, 0x00);

/// Every board, every dot lit
pub const ALL_BRIGHT: PanelFrame = PanelFrame::filled(ADDR_BROADCAST, COLUMN_ALL_LIT);

/// Anything that can answer "is this cell lit?" for the full 14x28 grid
pub trait PixelSource {
    /// `row` is in `0..PANEL_ROWS`, `col` in `0..PANEL_COLS`
    fn is_lit(&self, row: usize, col: usize) -> bool;
}

/// A native grid of 0/1 bytes, row 0 at the top
impl PixelSource for [[u8; PANEL_COLS]; PANEL_ROWS] {
    fn is_lit(&self, row: usize, col: usize) -> bool {
        self[row][col] != 0
    }
}

/// Flat row-major pixel buffer as delivered by remote clients
///
/// One byte per cell, non-zero means lit.
#[derive(Debug, Clone, Copy)]
pub struct FlatPixels<'a> {
    data: &'a [u8],
}

impl<'a> FlatPixels<'a> {
    /// Wrap a buffer of exactly [`PIXEL_COUNT`] bytes
    pub fn new(data: &'a [u8]) -> Result<Self, FrameError> {
        if data.len() != PIXEL_COUNT {
            return Err(FrameError::InvalidLength);
        }
        Ok(Self { data })
    }
}

impl PixelSource for FlatPixels<'_> {
    fn is_lit(&self, row: usize, col: usize) -> bool {
        self.data[row * PANEL_COLS + col] != 0
    }
}

/// One 32-byte board frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelFrame {
    bytes: [u8; PANEL_FRAME_LEN],
}

impl PanelFrame {
    /// Build a frame for `address` from 28 column masks
    pub const fn new(address: u8, columns: [u8; PANEL_COLS]) -> Self {
        let mut bytes = [0u8; PANEL_FRAME_LEN];
        bytes[0] = FRAME_MARKER;
        bytes[1] = FRAME_COMMAND;
        bytes[2] = address;
        let mut i = 0;
        while i < PANEL_COLS {
            bytes[COLUMNS_START + i] = columns[i];
            i += 1;
        }
        bytes[PANEL_FRAME_LEN - 1] = FRAME_END;
        Self { bytes }
    }

    /// Build a frame where every column carries the same mask
    pub const fn filled(address: u8, column: u8) -> Self {
        Self::new(address, [column; PANEL_COLS])
    }

    /// Validate raw bytes received from a bus monitor or test fixture
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        let bytes: [u8; PANEL_FRAME_LEN] =
            bytes.try_into().map_err(|_| FrameError::InvalidLength)?;

        if bytes[0] != FRAME_MARKER
            || bytes[1] != FRAME_COMMAND
            || bytes[PANEL_FRAME_LEN - 1] != FRAME_END
        {
            return Err(FrameError::InvalidMarker);
        }
        if !matches!(bytes[2], ADDR_TOP | ADDR_BOTTOM | ADDR_BROADCAST) {
            return Err(FrameError::InvalidAddress);
        }
        if bytes[COLUMNS_START..COLUMNS_END]
            .iter()
            .any(|&c| c & !COLUMN_ALL_LIT != 0)
        {
            return Err(FrameError::InvalidFrame);
        }

        Ok(Self { bytes })
    }

    /// Board address byte
    pub fn address(&self) -> u8 {
        self.bytes[2]
    }

    /// The 28 column masks
    pub fn columns(&self) -> &[u8] {
        &self.bytes[COLUMNS_START..COLUMNS_END]
    }

    /// Wire representation
    pub fn as_bytes(&self) -> &[u8; PANEL_FRAME_LEN] {
        &self.bytes
    }
}

/// Both board frames of a full display update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FramePair {
    /// Rows 0-6
    pub top: PanelFrame,
    /// Rows 7-13
    pub bottom: PanelFrame,
}

impl FramePair {
    /// Frames in transmit order, top board first
    pub fn iter(&self) -> impl Iterator<Item = &PanelFrame> {
        [&self.top, &self.bottom].into_iter()
    }
}

/// Encode a full display into its two board frames
///
/// Cells are visited in flat row-major order, the same order remote clients
/// send them in.
pub fn encode<P: PixelSource + ?Sized>(pixels: &P) -> FramePair {
    let mut top = [0u8; PANEL_COLS];
    let mut bottom = [0u8; PANEL_COLS];

    for index in 0..PIXEL_COUNT {
        let row = index / PANEL_COLS;
        let col = index % PANEL_COLS;
        if !pixels.is_lit(row, col) {
            continue;
        }
        if row < BOARD_ROWS {
            top[col] |= 1 << row;
        } else {
            bottom[col] |= 1 << (row - BOARD_ROWS);
        }
    }

    FramePair {
        top: PanelFrame::new(ADDR_TOP, top),
        bottom: PanelFrame::new(ADDR_BOTTOM, bottom),
    }
}

/// Encode a flat row-major buffer of [`PIXEL_COUNT`] bytes
pub fn encode_flat(data: &[u8]) -> Result<FramePair, FrameError> {
    Ok(encode(&FlatPixels::new(data)?))
}
