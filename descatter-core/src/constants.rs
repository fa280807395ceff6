//! Filter Geometry and Fixed-Point Constants
//!
//! All numeric values used by the filter live here so the index and scaling
//! arithmetic never carries magic numbers.
//!
//! ## Geometry
//!
//! ```text
//! 0 mm                                                       10000 mm
//! ├──8mm──┼──8mm──┼──8mm──┼─── ... ───┼──8mm──┤
//!  bin 0   bin 1   bin 2               bin 1249
//! ```
//!
//! Peaks at or beyond `MAX_DISTANCE_MM` are never judged as scattering.

/// The maximum distance at which descattering is done (mm).
///
/// 10 m covers the full range of common single-zone and multi-zone ToF parts.
pub const MAX_DISTANCE_MM: u32 = 10_000;

/// Width of one histogram bin (mm).
///
/// Used as a divisor on every training and query call, so powers of two are
/// preferred.
pub const BIN_WIDTH_MM: u16 = 8;

/// Number of bins for the default geometry.
pub const FILTER_LENGTH: usize = (MAX_DISTANCE_MM / BIN_WIDTH_MM as u32) as usize;

// ===== FIXED POINT =====

/// Number of fractional bits of the threshold representation.
pub const Q16_FRACTIONAL_BITS: u32 = 16;

/// 1.0 in Q0.16 (does not fit the `u16` storage of a threshold).
pub const Q16_ONE: u32 = 1 << Q16_FRACTIONAL_BITS;

/// Added before the final shift so scaled confidences round half up.
pub const Q16_ROUNDING_BIAS: u32 = 1 << (Q16_FRACTIONAL_BITS - 1);

/// Q0.16 value of one percent, truncated (65536 / 100 = 655).
pub const Q16_PER_PERCENT: u16 = (Q16_ONE / 100) as u16;

/// Largest accepted threshold percent. Higher requests are clamped.
pub const MAX_THRESHOLD_PERCENT: u8 = 99;
