//! Whole-frame processing
//!
//! Runs the documented frame contract in one call: reset, train with every
//! peak, then classify every peak. Results go into fixed-capacity
//! `heapless::Vec`s so the hot path stays allocation free.
//!
//! ```rust
//! use descatter_core::{Peak, ScatterFilter};
//!
//! let mut filter = ScatterFilter::new();
//! filter.configure(50, 40);
//!
//! let peaks = [Peak::new(1000, 1000), Peak::new(1024, 300), Peak::new(2500, 80)];
//! let report = filter.process_frame::<8>(&peaks)?;
//!
//! assert_eq!(report.kept(), &[Peak::new(1000, 1000), Peak::new(2500, 80)]);
//! assert_eq!(report.suppressed(), &[Peak::new(1024, 300)]);
//! # Ok::<(), descatter_core::DescatterError>(())
//! ```

use heapless::Vec;

use crate::{
    errors::{DescatterError, DescatterResult},
    filter::ScatterFilter,
    peak::Peak,
};

/// Peaks of one frame, split into real objects and ghosts
///
/// Both lists keep the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport<const M: usize> {
    kept: Vec<Peak, M>,
    suppressed: Vec<Peak, M>,
}

impl<const M: usize> FrameReport<M> {
    /// Peaks above the learned envelope
    pub fn kept(&self) -> &[Peak] {
        &self.kept
    }

    /// Peaks classified as scattering
    pub fn suppressed(&self) -> &[Peak] {
        &self.suppressed
    }

    /// Number of ghosts removed from the frame
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    /// Take the kept peaks, dropping the ghosts
    pub fn into_kept(self) -> Vec<Peak, M> {
        self.kept
    }
}

impl<const BINS: usize> ScatterFilter<BINS> {
    /// Reset, train with all `peaks`, then classify each of them.
    ///
    /// Fails without touching the filter when the frame holds more than `M`
    /// peaks.
    pub fn process_frame<const M: usize>(
        &mut self,
        peaks: &[Peak],
    ) -> DescatterResult<FrameReport<M>> {
        check_capacity::<M>(peaks)?;

        self.reset();
        self.train_all(peaks.iter().copied());
        self.classify(peaks)
    }

    /// Classify `peaks` against the envelope learned so far, without training.
    pub fn classify<const M: usize>(&self, peaks: &[Peak]) -> DescatterResult<FrameReport<M>> {
        check_capacity::<M>(peaks)?;

        let mut report = FrameReport::<M>::default();
        for &peak in peaks {
            let target = if self.is_scattering(peak) {
                &mut report.suppressed
            } else {
                &mut report.kept
            };
            target.push(peak).map_err(|_| DescatterError::FrameCapacityExceeded {
                capacity: M,
                peaks: peaks.len(),
            })?;
        }

        log_debug!(
            "Descatter frame: {} peaks, {} suppressed",
            peaks.len(),
            report.suppressed.len()
        );

        Ok(report)
    }
}

fn check_capacity<const M: usize>(peaks: &[Peak]) -> DescatterResult<()> {
    if peaks.len() > M {
        return Err(DescatterError::FrameCapacityExceeded {
            capacity: M,
            peaks: peaks.len(),
        });
    }
    Ok(())
}
