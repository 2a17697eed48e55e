//! Glyph measurement and rasterization

use crate::backend::DisplayError;
use crate::font::{char_code, Font, Spacing};
use crate::framebuffer::{Framebuffer, HEIGHT, WIDTH};

/// Horizontal extent of a glyph after trimming blank columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphMetrics {
    /// Blank columns before the first lit one
    pub left_trim: u8,
    /// Blank columns after the last lit one
    pub right_trim: u8,
    /// Columns actually drawn, never zero
    pub visible_width: u8,
}

/// Measure the lit column range of `code`
///
/// An all-blank glyph measures as one blank column so that spaces still
/// advance the cursor.
pub fn measure(font: &Font, code: u8) -> GlyphMetrics {
    let columns = font.glyph(code);
    let first = columns.iter().position(|&c| c != 0);
    let last = columns.iter().rposition(|&c| c != 0);

    match (first, last) {
        (Some(first), Some(last)) => GlyphMetrics {
            left_trim: first as u8,
            right_trim: (columns.len() - 1 - last) as u8,
            visible_width: (last - first + 1) as u8,
        },
        _ => GlyphMetrics {
            left_trim: 0,
            right_trim: font.width.saturating_sub(1),
            visible_width: 1,
        },
    }
}

/// Metrics used for layout, honouring the font's spacing mode
pub fn advance_metrics(font: &Font, code: u8) -> GlyphMetrics {
    match font.spacing {
        Spacing::Proportional => measure(font, code),
        Spacing::Monospace => GlyphMetrics {
            left_trim: 0,
            right_trim: 0,
            visible_width: font.width.max(1),
        },
    }
}

/// Columns `text` occupies when drawn on one line, gaps included
pub fn text_width(font: &Font, text: &str) -> usize {
    let widths = text
        .chars()
        .map(|ch| advance_metrics(font, char_code(ch)).visible_width as usize);
    widths.fold(0, |acc, w| if acc == 0 { w } else { acc + 1 + w })
}

/// Rasterize `code` with its left edge at column `x` and top at row `y`
///
/// Returns the visible width on success. Fails with `OutOfBounds` before
/// touching the framebuffer if the glyph would run past the right edge.
/// Rows below the framebuffer are clipped.
pub fn draw(
    fb: &mut Framebuffer,
    font: &Font,
    code: u8,
    x: usize,
    y: usize,
) -> Result<u8, DisplayError> {
    let metrics = advance_metrics(font, code);
    x.checked_add(metrics.visible_width as usize)
        .filter(|&end| end <= WIDTH)
        .ok_or(DisplayError::OutOfBounds)?;

    let columns = font.glyph(code);
    let start = metrics.left_trim as usize;
    let end = (start + metrics.visible_width as usize).min(columns.len());

    for (dx, &column) in columns[start..end].iter().enumerate() {
        for row in 0..font.height {
            let py = y.saturating_add(row as usize);
            if py >= HEIGHT {
                break;
            }
            if font.lit(column, row) {
                fb.set_pixel(x + dx, py, true)?;
            }
        }
    }

    Ok(metrics.visible_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FONT_3X5, FONT_5X7, FONT_5X7_MONO};
    use proptest::prelude::*;

    #[test]
    fn test_measure_trims_both_sides() {
        // '1' in 3x5 is just the middle column
        let m = measure(&FONT_3X5, b'1');
        assert_eq!(m, GlyphMetrics { left_trim: 1, right_trim: 1, visible_width: 1 });

        // '(' uses the first two columns
        let m = measure(&FONT_3X5, b'(');
        assert_eq!(m, GlyphMetrics { left_trim: 0, right_trim: 1, visible_width: 2 });

        let m = measure(&FONT_5X7, b'H');
        assert_eq!(m.visible_width, 5);
    }

    #[test]
    fn test_blank_glyph_is_one_column() {
        let m = measure(&FONT_5X7, b' ');
        assert_eq!(m, GlyphMetrics { left_trim: 0, right_trim: 4, visible_width: 1 });
    }

    #[test]
    fn test_monospace_uses_full_width() {
        assert_eq!(advance_metrics(&FONT_5X7_MONO, b'1').visible_width, 5);
        assert_eq!(advance_metrics(&FONT_5X7_MONO, b' ').visible_width, 5);
        assert_eq!(advance_metrics(&FONT_5X7, b'1').visible_width, 3);
    }

    #[test]
    fn test_draw_sets_expected_cells() {
        let mut fb = Framebuffer::new();
        assert_eq!(draw(&mut fb, &FONT_3X5, b'1', 4, 2), Ok(1));

        for y in 2..7 {
            assert_eq!(fb.get_pixel(4, y), Some(true));
        }
        assert_eq!(fb.lit_count(), 5);
    }

    #[test]
    fn test_draw_right_edge() {
        let mut fb = Framebuffer::new();
        // 'H' is 3 wide: fits at 25, not at 26
        assert_eq!(draw(&mut fb, &FONT_3X5, b'H', 25, 0), Ok(3));
        let before = fb.clone();
        assert_eq!(draw(&mut fb, &FONT_3X5, b'H', 26, 0), Err(DisplayError::OutOfBounds));
        assert_eq!(fb, before);
    }

    #[test]
    fn test_draw_clips_rows_below() {
        let mut fb = Framebuffer::new();
        assert_eq!(draw(&mut fb, &FONT_5X7, b'|', 0, 10), Ok(1));
        // rows 10..=13 of the 7-row bar survive
        assert_eq!(fb.lit_count(), 4);
    }

    #[test]
    fn test_draw_far_offsets() {
        let mut fb = Framebuffer::new();
        assert_eq!(draw(&mut fb, &FONT_5X7, b'A', usize::MAX, 0), Err(DisplayError::OutOfBounds));
        assert_eq!(draw(&mut fb, &FONT_5X7, b'|', 0, usize::MAX), Ok(1));
        assert!(fb.is_blank());
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(&FONT_3X5, ""), 0);
        assert_eq!(text_width(&FONT_3X5, "1"), 1);
        assert_eq!(text_width(&FONT_3X5, "H1H"), 3 + 1 + 1 + 1 + 3);
        assert_eq!(text_width(&FONT_5X7_MONO, "12"), 11);
    }

    proptest! {
        #[test]
        fn prop_measure_idempotent_and_nonzero(code in any::<u8>()) {
            for font in [&FONT_3X5, &FONT_5X7, &FONT_5X7_MONO] {
                let a = measure(font, code);
                let b = measure(font, code);
                prop_assert_eq!(a, b);
                prop_assert!(a.visible_width >= 1);
                prop_assert_eq!(
                    a.left_trim + a.visible_width + a.right_trim,
                    font.width
                );
            }
        }
    }
}
