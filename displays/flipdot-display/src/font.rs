//! Bitmap font descriptors
//!
//! Glyphs are stored column-major: one byte per column, bit N lights row N.
//! `start_offset` low bits of every column are skipped before the first
//! visible row.

/// How glyphs advance the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Spacing {
    /// Blank leading and trailing columns are trimmed
    Proportional,
    /// Every glyph takes the full font width
    Monospace,
}

/// An immutable glyph table plus its geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    glyphs: &'static [u8],
    /// Visible rows per glyph
    pub height: u8,
    /// Columns per glyph
    pub width: u8,
    /// Low bits skipped in each column byte
    pub start_offset: u8,
    pub spacing: Spacing,
}

/// Table index for a character code
///
/// Codes are masked to 7 bits; control characters map to index 0 (space).
pub fn glyph_index(code: u8) -> usize {
    let code = code & 0x7F;
    if code < b' ' {
        0
    } else {
        (code - b' ') as usize
    }
}

/// Character code for a `char`; anything outside ASCII maps to space
pub fn char_code(ch: char) -> u8 {
    if ch.is_ascii() {
        ch as u8
    } else {
        b' '
    }
}

impl Font {
    /// `glyphs` holds `width` bytes per character starting at `' '`
    pub const fn new(
        glyphs: &'static [u8],
        width: u8,
        height: u8,
        start_offset: u8,
        spacing: Spacing,
    ) -> Self {
        Self {
            glyphs,
            height,
            width,
            start_offset,
            spacing,
        }
    }

    /// Number of characters in the table
    pub fn glyph_count(&self) -> usize {
        if self.width == 0 {
            return 0;
        }
        self.glyphs.len() / self.width as usize
    }

    /// Column bytes for `code`
    ///
    /// Codes past the end of the table resolve to the blank glyph at index 0.
    pub fn glyph(&self, code: u8) -> &'static [u8] {
        let width = self.width as usize;
        let index = match glyph_index(code) {
            i if i < self.glyph_count() => i,
            _ => 0,
        };
        self.glyphs
            .get(index * width..(index + 1) * width)
            .unwrap_or(&[])
    }

    /// True if column byte `column` lights glyph row `row`
    pub fn lit(&self, column: u8, row: u8) -> bool {
        let bit = row + self.start_offset;
        bit < 8 && column & (1 << bit) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FONT_3X5, FONT_5X7};

    #[test]
    fn test_glyph_index() {
        assert_eq!(glyph_index(b' '), 0);
        assert_eq!(glyph_index(b'A'), 33);
        assert_eq!(glyph_index(b'\n'), 0);
        assert_eq!(glyph_index(b'A' | 0x80), 33);
    }

    #[test]
    fn test_past_table_is_blank() {
        // 3x5 table stops at '`'
        assert_eq!(FONT_3X5.glyph_count(), 65);
        assert_eq!(FONT_3X5.glyph(b'a'), FONT_3X5.glyph(b' '));
        assert_eq!(FONT_3X5.glyph(b'~'), &[0, 0, 0]);
    }

    #[test]
    fn test_glyph_slices_have_font_width() {
        for code in 0..=u8::MAX {
            assert_eq!(FONT_3X5.glyph(code).len(), 3);
            assert_eq!(FONT_5X7.glyph(code).len(), 5);
        }
    }

    #[test]
    fn test_non_ascii_char_is_space() {
        assert_eq!(char_code('é'), b' ');
        assert_eq!(char_code('Z'), b'Z');
    }

    #[test]
    fn test_lit_respects_offset() {
        // '1' in 3x5 is a full middle column, bits 2..=6
        let column = FONT_3X5.glyph(b'1')[1];
        for row in 0..5 {
            assert!(FONT_3X5.lit(column, row));
        }
        assert!(!FONT_3X5.lit(column, 5));
    }
}
