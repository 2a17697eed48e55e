//! Angle sensor filter
//!
//! Keeps the last N sensor readings and maps their median onto a single
//! display cell: azimuth picks the column, elevation the row with the
//! highest elevation at the top.

use heapless::Deque;

use flipdot_display::{HEIGHT, WIDTH};
use flipdot_protocol::AngleReading;

use crate::config::{AngleConfig, DegreeRange, MAX_ANGLE_SAMPLES};

/// Value the sensor reports for a field it could not measure
pub const MISSING: i16 = -1;

/// Display cell picked by the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Median-of-N filter over angle readings
#[derive(Debug, Clone)]
pub struct AngleFilter {
    window: usize,
    readings: Deque<AngleReading, MAX_ANGLE_SAMPLES>,
    azimuth: DegreeRange,
    elevation: DegreeRange,
}

impl AngleFilter {
    /// `window` is forced odd and into `1..=MAX_ANGLE_SAMPLES`
    pub fn new(window: usize, azimuth: DegreeRange, elevation: DegreeRange) -> Self {
        let window = (window.clamp(1, MAX_ANGLE_SAMPLES) - 1) | 1;
        Self {
            window: window.min(MAX_ANGLE_SAMPLES),
            readings: Deque::new(),
            azimuth,
            elevation,
        }
    }

    pub fn from_config(config: &AngleConfig) -> Self {
        Self::new(config.samples as usize, config.azimuth, config.elevation)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Add a reading; returns `false` if it was discarded as incomplete
    pub fn push(&mut self, reading: AngleReading) -> bool {
        if reading.azimuth == MISSING || reading.elevation == MISSING {
            return false;
        }
        if self.readings.len() >= self.window {
            self.readings.pop_front();
        }
        // Cannot fail: one slot was freed above if the window was full
        let _ = self.readings.push_back(reading);
        true
    }

    pub fn reset(&mut self) {
        self.readings.clear();
    }

    /// Median of the buffered readings, `None` before the first one
    pub fn median(&self) -> Option<AngleReading> {
        if self.readings.is_empty() {
            return None;
        }
        Some(AngleReading {
            azimuth: median_of(self.readings.iter().map(|r| r.azimuth)),
            elevation: median_of(self.readings.iter().map(|r| r.elevation)),
        })
    }

    /// Cell the display should light
    pub fn target(&self) -> Option<Cell> {
        let median = self.median()?;
        Some(Cell {
            row: elevation_to_row(median.elevation, self.elevation),
            col: azimuth_to_col(median.azimuth, self.azimuth),
        })
    }
}

fn median_of(values: impl Iterator<Item = i16>) -> i16 {
    let mut sorted = [0i16; MAX_ANGLE_SAMPLES];
    let mut len = 0;
    for (slot, value) in sorted.iter_mut().zip(values) {
        *slot = value;
        len += 1;
    }
    let sorted = &mut sorted[..len];
    sorted.sort_unstable();
    sorted[len / 2]
}

/// Clamp into `range` and spread it over the display width
pub fn azimuth_to_col(azimuth: i16, range: DegreeRange) -> usize {
    let offset = (range.clamp(azimuth) as i32 - range.min as i32) as u32;
    (offset * WIDTH as u32 / range.span()) as usize
}

/// Clamp into `range` and spread it over the display height, top = max
pub fn elevation_to_row(elevation: i16, range: DegreeRange) -> usize {
    let offset = (range.max as i32 - range.clamp(elevation) as i32) as u32;
    (offset * HEIGHT as u32 / range.span()) as usize
}
