//! Ghost-peak suppression for time-of-flight distance sensors
//!
//! Optical crosstalk between the lens and a cover glass makes a strong target
//! echo show up a second time as a weaker phantom peak a few centimetres away.
//! This crate learns, per frame, which distance regions are "scattered" by the
//! real peaks and flags every other peak that falls inside such a region
//! without being stronger than the learned envelope.
//!
//! Key constraints:
//! - Runs on small MCUs (2.5KB of bins with the default geometry)
//! - No heap allocation, no floating point
//! - Deterministic Q0.16 fixed-point arithmetic
//!
//! ```
//! use descatter_core::ScatterFilter;
//!
//! let mut filter = ScatterFilter::new();
//! filter.configure(50, 40);
//!
//! // New frame: reset, train with every peak, then query every peak
//! filter.reset();
//! filter.add_object_peak(1000, 1000);
//!
//! assert!(filter.is_scattering_peak(1010, 400));  // ghost
//! assert!(!filter.is_scattering_peak(1010, 600)); // strong enough to be real
//! assert!(!filter.is_scattering_peak(2000, 1));   // nothing learned there
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod frame;
pub mod geometry;
pub mod peak;

// Public API
pub use config::{DescatterConfig, Threshold};
pub use errors::{DescatterError, DescatterResult};
pub use filter::ScatterFilter;
pub use frame::FrameReport;
pub use geometry::BinGeometry;
pub use peak::Peak;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
