//! The 14x28 one-bit drawing surface

use flipdot_protocol::{PixelSource, FlatPixels, PANEL_COLS, PANEL_ROWS};

use crate::backend::DisplayError;
use crate::font::{char_code, Font};
use crate::glyph;

/// Columns
pub const WIDTH: usize = PANEL_COLS;

/// Rows
pub const HEIGHT: usize = PANEL_ROWS;

/// Text cursor position after a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

/// One bit per dot, row 0 at the top
///
/// Each row is a `u32` with bit N holding column N.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Framebuffer {
    rows: [u32; HEIGHT],
}

impl Framebuffer {
    /// An all-dark framebuffer
    pub const fn new() -> Self {
        Self { rows: [0; HEIGHT] }
    }

    /// Copy a flat row-major buffer (one byte per cell, non-zero = lit)
    pub fn from_flat(data: &[u8]) -> Result<Self, DisplayError> {
        let pixels = FlatPixels::new(data).map_err(|_| DisplayError::InvalidBitmap)?;
        let mut fb = Self::new();
        fb.load(&pixels);
        Ok(fb)
    }

    /// Replace the whole surface with `source`
    pub fn load<P: PixelSource + ?Sized>(&mut self, source: &P) {
        for (y, row) in self.rows.iter_mut().enumerate() {
            *row = (0..WIDTH)
                .filter(|&x| source.is_lit(y, x))
                .fold(0, |acc, x| acc | 1 << x);
        }
    }

    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: bool) {
        let row = if value { (1u32 << WIDTH) - 1 } else { 0 };
        self.rows = [row; HEIGHT];
    }

    /// Set one cell; coordinates outside the surface are rejected
    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) -> Result<(), DisplayError> {
        if x >= WIDTH || y >= HEIGHT {
            return Err(DisplayError::OutOfBounds);
        }
        if value {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
        Ok(())
    }

    /// `None` outside the surface
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        Some(self.rows[y] & (1 << x) != 0)
    }

    pub fn lit_count(&self) -> usize {
        self.rows.iter().map(|r| r.count_ones() as usize).sum()
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }

    /// Row bitmasks, bit N = column N
    pub fn as_rows(&self) -> &[u32; HEIGHT] {
        &self.rows
    }

    /// Rows as 0/1 cell arrays
    pub fn iter_rows(&self) -> impl Iterator<Item = [u8; WIDTH]> + '_ {
        self.rows.iter().map(|&bits| {
            let mut cells = [0u8; WIDTH];
            for (x, cell) in cells.iter_mut().enumerate() {
                *cell = ((bits >> x) & 1) as u8;
            }
            cells
        })
    }

    /// Draw one glyph, returning its visible width
    pub fn draw_glyph(&mut self, font: &Font, code: u8, x: usize, y: usize) -> Result<u8, DisplayError> {
        glyph::draw(self, font, code, x, y)
    }

    /// Draw `text` starting at (`x`, `y`)
    ///
    /// Each glyph advances the cursor by its visible width plus one blank
    /// column. When a glyph hits the right edge and `wrap` is set, drawing
    /// continues at `x` on the line `font.height + 1` rows below; a glyph
    /// that cannot fit even there, or a line starting below the surface,
    /// stops with `OutOfBounds`. Without `wrap` drawing stops silently at
    /// the first glyph that does not fit. Cells already drawn stay drawn.
    pub fn draw_string(
        &mut self,
        text: &str,
        x: usize,
        y: usize,
        font: &Font,
        wrap: bool,
    ) -> Result<Cursor, DisplayError> {
        self.draw_codes(text.chars().map(char_code), x, y, font, wrap)
    }

    pub(crate) fn draw_codes(
        &mut self,
        codes: impl Iterator<Item = u8>,
        x: usize,
        y: usize,
        font: &Font,
        wrap: bool,
    ) -> Result<Cursor, DisplayError> {
        let mut cursor = Cursor { x, y };

        for code in codes {
            let width = match glyph::draw(self, font, code, cursor.x, cursor.y) {
                Ok(width) => width,
                Err(DisplayError::OutOfBounds) if wrap => {
                    if cursor.x == x {
                        return Err(DisplayError::OutOfBounds);
                    }
                    cursor.x = x;
                    cursor.y = cursor.y.saturating_add(font.height as usize + 1);
                    if cursor.y >= HEIGHT {
                        return Err(DisplayError::OutOfBounds);
                    }
                    glyph::draw(self, font, code, cursor.x, cursor.y)?
                }
                Err(DisplayError::OutOfBounds) => return Ok(cursor),
                Err(e) => return Err(e),
            };
            cursor.x = cursor.x.saturating_add(width as usize + 1);
        }

        Ok(cursor)
    }

    /// Blit a row-major bitmap, one byte per cell, non-zero = lit
    ///
    /// Cells falling outside the surface are clipped. `invert` flips every
    /// source cell before it is written.
    pub fn draw_bitmap(
        &mut self,
        width: usize,
        height: usize,
        bitmap: &[u8],
        x: usize,
        y: usize,
        invert: bool,
    ) -> Result<(), DisplayError> {
        let needed = width.checked_mul(height).ok_or(DisplayError::InvalidBitmap)?;
        if bitmap.len() < needed {
            return Err(DisplayError::InvalidBitmap);
        }

        for (row, line) in bitmap[..needed].chunks(width.max(1)).enumerate() {
            for (col, &cell) in line.iter().enumerate() {
                let (Some(px), Some(py)) = (x.checked_add(col), y.checked_add(row)) else {
                    continue;
                };
                if px < WIDTH && py < HEIGHT {
                    self.set_pixel(px, py, (cell != 0) ^ invert)?;
                }
            }
        }
        Ok(())
    }
}

impl PixelSource for Framebuffer {
    fn is_lit(&self, row: usize, col: usize) -> bool {
        self.get_pixel(col, row).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FONT_3X5, FONT_5X7};
    use flipdot_protocol::{encode, encode_flat, ALL_BRIGHT, ALL_DARK, PIXEL_COUNT};
    use proptest::prelude::*;

    #[test]
    fn test_set_pixel_bounds() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.set_pixel(27, 13, true), Ok(()));
        assert_eq!(fb.set_pixel(0, 0, true), Ok(()));
        assert_eq!(fb.set_pixel(28, 0, true), Err(DisplayError::OutOfBounds));
        assert_eq!(fb.set_pixel(0, 14, true), Err(DisplayError::OutOfBounds));

        assert_eq!(fb.get_pixel(27, 13), Some(true));
        assert_eq!(fb.get_pixel(28, 0), None);
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_set_pixel_off() {
        let mut fb = Framebuffer::new();
        fb.fill(true);
        fb.set_pixel(3, 4, false).unwrap();
        assert_eq!(fb.get_pixel(3, 4), Some(false));
        assert_eq!(fb.lit_count(), WIDTH * HEIGHT - 1);
    }

    #[test]
    fn test_encode_all_dark_and_bright() {
        let mut fb = Framebuffer::new();
        let pair = encode(&fb);
        for frame in pair.iter() {
            assert_eq!(frame.columns(), ALL_DARK.columns());
        }

        fb.fill(true);
        let pair = encode(&fb);
        for frame in pair.iter() {
            assert_eq!(frame.columns(), ALL_BRIGHT.columns());
        }
    }

    #[test]
    fn test_draw_string_repeatable() {
        let mut fb = Framebuffer::new();
        fb.draw_string("AB", 0, 0, &FONT_3X5, false).unwrap();
        let first = fb.clone();

        fb.clear();
        assert!(fb.is_blank());
        fb.draw_string("AB", 0, 0, &FONT_3X5, false).unwrap();
        assert_eq!(fb, first);
    }

    #[test]
    fn test_draw_string_advance() {
        let mut fb = Framebuffer::new();
        // '1' is one column wide, so each advances by 2
        let cursor = fb.draw_string("111", 0, 0, &FONT_3X5, false).unwrap();
        assert_eq!(cursor, Cursor { x: 6, y: 0 });
        for x in [0, 2, 4] {
            assert_eq!(fb.get_pixel(x, 0), Some(true));
        }
        assert_eq!(fb.get_pixel(1, 0), Some(false));
    }

    #[test]
    fn test_draw_string_stops_without_wrap() {
        let mut fb = Framebuffer::new();
        // 8 glyphs of 3 columns + gap = 32 > 28
        let cursor = fb.draw_string("HHHHHHHH", 0, 0, &FONT_3X5, false).unwrap();
        assert_eq!(cursor, Cursor { x: 28, y: 0 });
        assert_eq!(fb.lit_count(), 7 * FONT_3X5_H_CELLS);
    }

    // Lit cells in a 3x5 'H'
    const FONT_3X5_H_CELLS: usize = 5 + 1 + 5;

    #[test]
    fn test_draw_string_wraps() {
        let mut fb = Framebuffer::new();
        let cursor = fb.draw_string("HHHHHHHHH", 0, 0, &FONT_3X5, true).unwrap();

        // 7 on the first line, 2 on the next one font_height + 1 rows down
        assert_eq!(cursor, Cursor { x: 8, y: 6 });
        assert_eq!(fb.lit_count(), 9 * FONT_3X5_H_CELLS);
        assert_eq!(fb.get_pixel(0, 6), Some(true));
        assert_eq!(fb.get_pixel(4, 10), Some(true));
    }

    #[test]
    fn test_draw_string_wrap_runs_out_of_rows() {
        let mut fb = Framebuffer::new();
        let text = "HHHHHHHHHHHHHHHHHHHHHH";
        assert_eq!(
            fb.draw_string(text, 0, 0, &FONT_5X7, true),
            Err(DisplayError::OutOfBounds)
        );
        // two full lines of four glyphs survive
        assert!(fb.get_pixel(0, 8).unwrap());
    }

    #[test]
    fn test_draw_string_wrap_glyph_never_fits() {
        let mut fb = Framebuffer::new();
        assert_eq!(
            fb.draw_string("H", 25, 0, &FONT_5X7, true),
            Err(DisplayError::OutOfBounds)
        );
        assert!(fb.is_blank());
    }

    #[test]
    fn test_unknown_code_is_blank() {
        let mut fb = Framebuffer::new();
        // lowercase is past the end of the 3x5 table
        let cursor = fb.draw_string("ab", 0, 0, &FONT_3X5, false).unwrap();
        assert!(fb.is_blank());
        assert_eq!(cursor.x, 4);
    }

    #[test]
    fn test_draw_bitmap_clips_and_inverts() {
        let mut fb = Framebuffer::new();
        let bitmap = [1, 0, 0, 1];
        fb.draw_bitmap(2, 2, &bitmap, 27, 13, false).unwrap();
        assert_eq!(fb.get_pixel(27, 13), Some(true));
        assert_eq!(fb.lit_count(), 1);

        fb.clear();
        fb.draw_bitmap(2, 2, &bitmap, 0, 0, true).unwrap();
        assert_eq!(fb.get_pixel(1, 0), Some(true));
        assert_eq!(fb.get_pixel(0, 1), Some(true));
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_draw_bitmap_short_input() {
        let mut fb = Framebuffer::new();
        assert_eq!(
            fb.draw_bitmap(3, 3, &[1; 8], 0, 0, false),
            Err(DisplayError::InvalidBitmap)
        );
        assert!(fb.is_blank());
    }

    #[test]
    fn test_far_offsets_are_clipped() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.draw_bitmap(2, 1, &[1, 1], usize::MAX, 0, false), Ok(()));
        assert_eq!(fb.draw_bitmap(1, 2, &[1, 1], 0, usize::MAX, false), Ok(()));
        assert_eq!(fb.draw_bitmap(2, 2, &[1; 4], usize::MAX - 1, usize::MAX - 1, true), Ok(()));
        assert!(fb.is_blank());

        let cursor = fb.draw_string("AB", usize::MAX, 0, &FONT_3X5, false).unwrap();
        assert_eq!(cursor, Cursor { x: usize::MAX, y: 0 });
        assert_eq!(
            fb.draw_string("AB", usize::MAX, 0, &FONT_3X5, true),
            Err(DisplayError::OutOfBounds)
        );
        fb.draw_string("AB", 0, usize::MAX, &FONT_3X5, false).unwrap();
        assert!(fb.is_blank());
    }

    #[test]
    fn test_from_flat() {
        let mut flat = [0u8; PIXEL_COUNT];
        flat[WIDTH * 2 + 5] = 1;
        let fb = Framebuffer::from_flat(&flat).unwrap();
        assert_eq!(fb.get_pixel(5, 2), Some(true));
        assert_eq!(fb.lit_count(), 1);

        assert_eq!(Framebuffer::from_flat(&flat[1..]), Err(DisplayError::InvalidBitmap));
    }

    #[test]
    fn test_iter_rows() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(1, 0, true).unwrap();
        let rows: std::vec::Vec<_> = fb.iter_rows().collect();
        assert_eq!(rows.len(), HEIGHT);
        assert_eq!(rows[0][1], 1);
        assert_eq!(rows[0][0], 0);
        assert_eq!(fb.as_rows()[0], 0b10);
    }

    proptest! {
        #[test]
        fn prop_framebuffer_and_flat_encode_identically(
            cells in proptest::collection::vec(0u8..2, PIXEL_COUNT)
        ) {
            let fb = Framebuffer::from_flat(&cells).unwrap();
            prop_assert_eq!(encode(&fb), encode_flat(&cells).unwrap());
        }

        #[test]
        fn prop_writes_stay_in_bounds(x in 0usize..40, y in 0usize..20) {
            let mut fb = Framebuffer::new();
            let result = fb.set_pixel(x, y, true);
            prop_assert_eq!(result.is_ok(), x < WIDTH && y < HEIGHT);
            prop_assert_eq!(fb.lit_count(), usize::from(result.is_ok()));
        }
    }
}
