//! Filter configuration
//!
//! A configuration is two numbers:
//! - the scatter threshold, a fraction in [0.0, 0.99] stored as unsigned Q0.16
//! - the maximum scatter distance, how far (±mm) a ghost can sit from the peak
//!   that caused it
//!
//! The threshold is built from an integer percent exactly the way sensor
//! firmware does it: `percent * (65536 / 100)` with truncating division, so 50%
//! becomes `32750`, not `32768`. Keep it that way; tuned deployments depend on
//! bit-identical envelopes.

use crate::constants::{
    MAX_THRESHOLD_PERCENT, Q16_FRACTIONAL_BITS, Q16_PER_PERCENT, Q16_ROUNDING_BIAS,
};

/// Scatter threshold as unsigned Q0.16 fixed point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Threshold(u16);

impl Threshold {
    /// Threshold that scales every confidence to zero
    pub const ZERO: Self = Self(0);

    /// Build from a percent, clamping anything above 99
    pub const fn from_percent(percent: u8) -> Self {
        let percent = if percent > MAX_THRESHOLD_PERCENT {
            MAX_THRESHOLD_PERCENT
        } else {
            percent
        };
        Self(percent as u16 * Q16_PER_PERCENT)
    }

    /// Raw Q0.16 bits
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Scale a confidence by this threshold, rounding half up.
    ///
    /// `(confidence * threshold + 0.5) >> 16`, computed in 32 bits. The
    /// threshold is below 1.0 so the result always fits back into `u16`.
    pub const fn scale(self, confidence: u16) -> u16 {
        let wide = confidence as u32 * self.0 as u32 + Q16_ROUNDING_BIAS;
        (wide >> Q16_FRACTIONAL_BITS) as u16
    }
}

/// Descattering configuration. Can be read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DescatterConfig {
    /// Peaks are considered scatter if they are at or below this fraction of a
    /// nearby stronger peak
    pub threshold: Threshold,

    /// How far (±mm) a scatter peak can be away from the originating object
    pub max_scatter_distance_mm: u16,
}

impl DescatterConfig {
    /// Create a configuration from a threshold percent and a window half-width.
    ///
    /// Percent values above 99 are clamped. The distance is stored verbatim,
    /// even if it reaches beyond the modeled range.
    pub const fn new(threshold_percent: u8, max_scatter_distance_mm: u16) -> Self {
        Self {
            threshold: Threshold::from_percent(threshold_percent),
            max_scatter_distance_mm,
        }
    }

    /// Example values: 50% threshold, ±40 mm window
    pub const fn narrow_window() -> Self {
        Self::new(50, 40)
    }

    /// Example values: 20% threshold, ±120 mm window
    pub const fn wide_window() -> Self {
        Self::new(20, 120)
    }
}
