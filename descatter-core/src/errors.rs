//! Error Types for Filter Construction and Frame Processing
//!
//! The four core filter operations (configure, reset, train, query) are total
//! functions and never fail: out-of-range inputs are clamped instead. Errors
//! only come from building a filter with an impossible geometry and from the
//! frame helpers, whose output has a fixed capacity.
//!
//! Like the rest of the crate, errors are small `Copy` values with no heap
//! data, so they can be returned from interrupt context or queued.
//!
//! ```rust
//! use descatter_core::{DescatterError, ScatterFilter};
//!
//! match ScatterFilter::<1250>::with_bin_width(0) {
//!     Ok(_) => unreachable!(),
//!     Err(DescatterError::InvalidBinWidth { .. }) => {
//!         // fall back to the default geometry
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for filter construction and frame processing
pub type DescatterResult<T> = Result<T, DescatterError>;

/// Descatter errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescatterError {
    /// Bin width must be at least one millimetre
    #[error("Invalid bin width {bin_width_mm} mm")]
    InvalidBinWidth {
        /// The rejected bin width
        bin_width_mm: u16,
    },

    /// A histogram needs at least one bin
    #[error("Histogram has no bins")]
    EmptyHistogram,

    /// More peaks in one frame than the report can hold
    #[error("Frame of {peaks} peaks exceeds capacity {capacity}")]
    FrameCapacityExceeded {
        /// Capacity of the frame report
        capacity: usize,
        /// Number of peaks handed in
        peaks: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for DescatterError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidBinWidth { bin_width_mm } =>
                defmt::write!(fmt, "Invalid bin width {} mm", bin_width_mm),
            Self::EmptyHistogram =>
                defmt::write!(fmt, "Histogram has no bins"),
            Self::FrameCapacityExceeded { capacity, peaks } =>
                defmt::write!(fmt, "Frame of {} peaks exceeds capacity {}", peaks, capacity),
        }
    }
}
