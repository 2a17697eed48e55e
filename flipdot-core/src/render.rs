//! Screens drawn by the static modes

use core::fmt::Write;

use heapless::String;

use flipdot_display::fonts::{FONT_3X5, FONT_5X7, FONT_5X7_MONO};
use flipdot_display::{text_width, DisplayError, Font, Framebuffer, HEIGHT, WIDTH};
use flipdot_protocol::{SolarStats, WallTime};

use crate::angle::Cell;

/// Top row of the clock digits
pub const CLOCK_Y: usize = 2;

/// Row holding the seconds bar
pub const SECONDS_ROW: usize = HEIGHT - 1;

/// Top rows of the two solar lines
pub const SOLAR_POWER_Y: usize = 1;
pub const SOLAR_ENERGY_Y: usize = 8;

type Line = String<8>;

/// `HH:MM` with monospace digits and a seconds bar along the bottom row
///
/// Without a time the digits show as dashes and the bar stays dark.
pub fn draw_clock(fb: &mut Framebuffer, time: Option<WallTime>) -> Result<(), DisplayError> {
    let (hours, minutes) = match time {
        Some(t) => (two_digits(t.hour), two_digits(t.minute)),
        None => (dashes(), dashes()),
    };

    let width = text_width(&FONT_5X7_MONO, &hours)
        + 1
        + text_width(&FONT_5X7, ":")
        + 1
        + text_width(&FONT_5X7_MONO, &minutes);
    let x = WIDTH.saturating_sub(width) / 2;

    let cursor = fb.draw_string(&hours, x, CLOCK_Y, &FONT_5X7_MONO, false)?;
    let cursor = fb.draw_string(":", cursor.x, CLOCK_Y, &FONT_5X7, false)?;
    fb.draw_string(&minutes, cursor.x, CLOCK_Y, &FONT_5X7_MONO, false)?;

    if let Some(t) = time {
        for col in 0..seconds_bar_len(t.second) {
            fb.set_pixel(col, SECONDS_ROW, true)?;
        }
    }
    Ok(())
}

/// Lit columns of the seconds bar
pub fn seconds_bar_len(second: u8) -> usize {
    (second.min(59) as usize + 1) * WIDTH / 60
}

/// Current power on the top line, today's energy below it
pub fn draw_solar(fb: &mut Framebuffer, stats: Option<SolarStats>) -> Result<(), DisplayError> {
    match stats {
        Some(stats) => {
            draw_centered(fb, &format_power(stats.power_w), SOLAR_POWER_Y, &FONT_3X5)?;
            draw_centered(fb, &format_energy(stats.energy_today_wh), SOLAR_ENERGY_Y, &FONT_3X5)
        }
        None => draw_centered(fb, "----", SOLAR_POWER_Y, &FONT_3X5),
    }
}

/// Light the cell picked by the angle filter, nothing before a reading
pub fn draw_angle(fb: &mut Framebuffer, cell: Option<Cell>) -> Result<(), DisplayError> {
    match cell {
        Some(cell) => fb.set_pixel(cell.col, cell.row, true),
        None => Ok(()),
    }
}

fn draw_centered(fb: &mut Framebuffer, text: &str, y: usize, font: &Font) -> Result<(), DisplayError> {
    let x = WIDTH.saturating_sub(text_width(font, text)) / 2;
    fb.draw_string(text, x, y, font, false).map(|_| ())
}

fn two_digits(value: u8) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{:02}", value % 100);
    line
}

fn dashes() -> Line {
    Line::try_from("--").unwrap_or_default()
}

/// `850W`, `1234W`, `12KW`
pub fn format_power(watts: u16) -> Line {
    let mut line = Line::new();
    let _ = if watts < 10_000 {
        write!(line, "{watts}W")
    } else {
        write!(line, "{}KW", watts / 1000)
    };
    line
}

/// `850`, `5.6K`, `23K`, `1.2M` (watt-hours)
pub fn format_energy(wh: u32) -> Line {
    let mut line = Line::new();
    let _ = match wh {
        0..=999 => write!(line, "{wh}"),
        1_000..=9_999 => write!(line, "{}.{}K", wh / 1000, wh % 1000 / 100),
        10_000..=999_999 => write!(line, "{}K", wh / 1000),
        _ => write!(line, "{}.{}M", wh / 1_000_000, wh % 1_000_000 / 100_000),
    };
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u8, minute: u8, second: u8) -> Option<WallTime> {
        WallTime::new(hour, minute, second)
    }

    #[test]
    fn test_format_power() {
        assert_eq!(format_power(0).as_str(), "0W");
        assert_eq!(format_power(1234).as_str(), "1234W");
        assert_eq!(format_power(12_500).as_str(), "12KW");
    }

    #[test]
    fn test_format_energy() {
        assert_eq!(format_energy(850).as_str(), "850");
        assert_eq!(format_energy(5_650).as_str(), "5.6K");
        assert_eq!(format_energy(23_400).as_str(), "23K");
        assert_eq!(format_energy(1_250_000).as_str(), "1.2M");
    }

    #[test]
    fn test_seconds_bar() {
        assert_eq!(seconds_bar_len(0), 0);
        assert_eq!(seconds_bar_len(29), 14);
        assert_eq!(seconds_bar_len(59), WIDTH);
    }

    #[test]
    fn test_clock_layout() {
        let mut fb = Framebuffer::new();
        draw_clock(&mut fb, time(12, 34, 29)).unwrap();

        // bar covers exactly the first 14 columns of the last row
        assert_eq!(fb.as_rows()[SECONDS_ROW], (1 << 14) - 1);
        // nothing above the digits
        assert!(fb.as_rows()[..CLOCK_Y].iter().all(|&r| r == 0));
        // colon dots sit in the middle columns
        assert_eq!(fb.get_pixel(13, CLOCK_Y + 1), Some(true));
    }

    #[test]
    fn test_clock_digits_do_not_shift() {
        let mut ones = Framebuffer::new();
        draw_clock(&mut ones, time(11, 11, 0)).unwrap();
        let mut eights = Framebuffer::new();
        draw_clock(&mut eights, time(18, 18, 0)).unwrap();

        // the colon lands in the same place regardless of digit shapes
        for y in CLOCK_Y..CLOCK_Y + 7 {
            assert_eq!(ones.get_pixel(13, y), eights.get_pixel(13, y));
            assert_eq!(ones.get_pixel(14, y), eights.get_pixel(14, y));
        }
    }

    #[test]
    fn test_clock_without_time() {
        let mut fb = Framebuffer::new();
        draw_clock(&mut fb, None).unwrap();
        assert_eq!(fb.as_rows()[SECONDS_ROW], 0);
        assert!(!fb.is_blank());
    }

    #[test]
    fn test_solar_two_lines() {
        let mut fb = Framebuffer::new();
        let stats = SolarStats {
            power_w: 1234,
            energy_today_wh: 5_600,
        };
        draw_solar(&mut fb, Some(stats)).unwrap();

        let rows = fb.as_rows();
        assert!(rows[SOLAR_POWER_Y..SOLAR_POWER_Y + 5].iter().any(|&r| r != 0));
        assert!(rows[SOLAR_ENERGY_Y..SOLAR_ENERGY_Y + 5].iter().any(|&r| r != 0));
        assert_eq!(rows[0], 0);
        assert_eq!(rows[6], 0);
    }

    #[test]
    fn test_angle_cell() {
        let mut fb = Framebuffer::new();
        draw_angle(&mut fb, Some(Cell { row: 3, col: 20 })).unwrap();
        assert_eq!(fb.get_pixel(20, 3), Some(true));
        assert_eq!(fb.lit_count(), 1);

        fb.clear();
        draw_angle(&mut fb, None).unwrap();
        assert!(fb.is_blank());
    }
}
