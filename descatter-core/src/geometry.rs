//! Histogram geometry: distance to bin index arithmetic
//!
//! Bin `i` covers the half-open range `[i * width, (i + 1) * width)` mm. All
//! conversions use truncating integer division, matching the firmware the
//! filter is tuned against.

use core::ops::Range;

use crate::{
    constants::{BIN_WIDTH_MM, FILTER_LENGTH},
    errors::{DescatterError, DescatterResult},
};

/// Layout of the distance histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinGeometry {
    bin_width_mm: u16,
    bin_count: usize,
}

impl Default for BinGeometry {
    fn default() -> Self {
        Self {
            bin_width_mm: BIN_WIDTH_MM,
            bin_count: FILTER_LENGTH,
        }
    }
}

impl BinGeometry {
    /// Create a geometry of `bin_count` bins, each `bin_width_mm` wide
    pub fn new(bin_width_mm: u16, bin_count: usize) -> DescatterResult<Self> {
        if bin_width_mm == 0 {
            return Err(DescatterError::InvalidBinWidth { bin_width_mm });
        }
        if bin_count == 0 {
            return Err(DescatterError::EmptyHistogram);
        }

        Ok(Self {
            bin_width_mm,
            bin_count,
        })
    }

    /// Width of one bin in mm
    pub fn bin_width_mm(&self) -> u16 {
        self.bin_width_mm
    }

    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// First distance that is no longer modeled (mm)
    pub fn max_distance_mm(&self) -> u32 {
        // Saturates for absurd geometries; every u16 distance is then in range
        saturate_u32(self.bin_count as u64 * self.bin_width_mm as u64)
    }

    /// Bin holding `distance_mm`, or `None` at or beyond the modeled range
    pub fn bin_index(&self, distance_mm: u16) -> Option<usize> {
        if distance_mm as u32 >= self.max_distance_mm() {
            return None;
        }
        Some((distance_mm / self.bin_width_mm) as usize)
    }

    /// Distance span covered by bin `index` (mm), `None` past the last bin.
    ///
    /// Saturates like [`Self::max_distance_mm`] for geometries reaching past
    /// `u32::MAX` mm.
    pub fn bin_range_mm(&self, index: usize) -> Option<Range<u32>> {
        if index >= self.bin_count {
            return None;
        }
        let width = self.bin_width_mm as u64;
        let start = index as u64 * width;
        let end = start + width;
        Some(saturate_u32(start)..saturate_u32(end))
    }

    /// Bins raised when training a peak at `distance_mm`.
    ///
    /// Both window ends are converted with truncating division, then the lower
    /// end is clamped to 0 and the upper end to the last bin. The upper end is
    /// exclusive, so the last bin of the histogram is never trained and the
    /// bin holding `distance_mm + max_scatter_distance_mm` is left alone.
    /// The returned range may be empty but is always a valid slice range.
    pub fn window(&self, distance_mm: u16, max_scatter_distance_mm: u16) -> Range<usize> {
        let width = self.bin_width_mm as i32;
        let lower_mm = distance_mm as i32 - max_scatter_distance_mm as i32;
        let upper_mm = distance_mm as i32 + max_scatter_distance_mm as i32;

        // i32 division truncates toward zero, so -7 / 8 lands in bin 0 as well
        let first = (lower_mm / width).max(0) as usize;
        let last = ((upper_mm / width) as usize).min(self.bin_count - 1);

        first.min(last)..last
    }
}

fn saturate_u32(value: u64) -> u32 {
    value.min(u32::MAX as u64) as u32
}
