//! The descattering filter
//!
//! ## Overview
//!
//! Strong echoes leak through the optical stack (lens, cover glass, housing)
//! and show up as weaker phantom peaks close to the real object. The filter
//! keeps a histogram over distance where every bin holds the strongest
//! "scatter envelope" any trained peak has cast over it. A peak whose own
//! confidence does not exceed the envelope at its distance is indistinguishable
//! from scattering and is reported as a ghost.
//!
//! ```text
//!  confidence
//!      │          ▲ real peak (1000)
//!      │          │
//!      │   ┌──────┼──────┐  envelope = 50% of 1000 = 500
//!      │   │  ▲   │      │
//!      │   │  │ghost(400)│     ▲ real (600), above the envelope
//!      └───┴──┴───┴──────┴─────┴──────────── distance
//!         d-m     d     d+m
//! ```
//!
//! ## Frame contract
//!
//! ```text
//! configure ──► reset ──► add_object_peak* ──► is_scattering_peak* ──┐
//!                 ▲                                                  │
//!                 └──────────────────── next frame ──────────────────┘
//! ```
//!
//! 1. `configure` whenever the settings change (this also clears the bins)
//! 2. `reset` at the start of every frame
//! 3. `add_object_peak` for every peak of the frame
//! 4. `is_scattering_peak` for every peak of the frame
//!
//! Ordering is caller discipline. The filter does not guard against querying
//! before training is complete; such a query simply sees the envelope learned
//! so far.
//!
//! ## Thread Safety
//!
//! No internal locking. Mutation needs `&mut self`, so share a filter between
//! threads through a mutex or give every pipeline its own instance.

use core::fmt;

use crate::{
    config::DescatterConfig,
    constants::{FILTER_LENGTH, MAX_THRESHOLD_PERCENT},
    errors::DescatterResult,
    geometry::BinGeometry,
    peak::Peak,
};

/// Ghost-peak filter over `BINS` distance bins
///
/// The default of 1250 bins of 8 mm models 0 to 10 m and takes 2.5KB.
#[derive(Clone)]
pub struct ScatterFilter<const BINS: usize = FILTER_LENGTH> {
    config: DescatterConfig,
    geometry: BinGeometry,
    /// Learned envelope per bin, in scaled-confidence units
    bins: [u16; BINS],
}

impl ScatterFilter<FILTER_LENGTH> {
    /// Filter with the default geometry (1250 bins of 8 mm), not yet configured.
    ///
    /// An unconfigured filter has a zero threshold and a zero-width window, so
    /// training has no effect until `configure` is called.
    pub fn new() -> Self {
        Self {
            config: DescatterConfig::default(),
            geometry: BinGeometry::default(),
            bins: [0; FILTER_LENGTH],
        }
    }
}

impl Default for ScatterFilter<FILTER_LENGTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BINS: usize> ScatterFilter<BINS> {
    /// Filter with `BINS` bins of `bin_width_mm` each
    pub fn with_bin_width(bin_width_mm: u16) -> DescatterResult<Self> {
        Ok(Self {
            config: DescatterConfig::default(),
            geometry: BinGeometry::new(bin_width_mm, BINS)?,
            bins: [0; BINS],
        })
    }

    /// Filter with a custom geometry and an initial configuration
    pub fn with_config(bin_width_mm: u16, config: DescatterConfig) -> DescatterResult<Self> {
        let mut filter = Self::with_bin_width(bin_width_mm)?;
        filter.apply_config(config);
        Ok(filter)
    }

    /// Configure the filter. Call this every time the settings change.
    ///
    /// `threshold_percent` above 99 is clamped to 99. `max_scatter_distance_mm`
    /// is the largest distance between a peak and its ghost (without distance
    /// correction) and is stored as given. All learned data is discarded.
    pub fn configure(&mut self, threshold_percent: u8, max_scatter_distance_mm: u16) {
        let config = DescatterConfig::new(threshold_percent, max_scatter_distance_mm);
        if threshold_percent > MAX_THRESHOLD_PERCENT {
            log_debug!(
                "Descatter threshold {}% clamped to {}%",
                threshold_percent,
                MAX_THRESHOLD_PERCENT
            );
        }
        self.apply_config(config);
    }

    /// Install a prepared configuration. Same effect as [`Self::configure`].
    pub fn apply_config(&mut self, config: DescatterConfig) {
        self.config = config;
        self.bins.fill(0);

        log_debug!(
            "Descatter configured: threshold {} (Q0.16), max scatter distance {} mm",
            config.threshold.to_bits(),
            config.max_scatter_distance_mm
        );
    }

    /// Forget everything learned. Call this at the start of every frame.
    pub fn reset(&mut self) {
        self.bins.fill(0);
        log_debug!("Descatter reset");
    }

    /// Train the filter with one peak of the current frame.
    ///
    /// Raises every bin within `±max_scatter_distance_mm` of the peak to at
    /// least `confidence * threshold`. Bins are never lowered. Zero
    /// confidence marks an invalid object and is ignored.
    pub fn add_object_peak(&mut self, distance_mm: u16, confidence: u16) {
        self.train(Peak::new(distance_mm, confidence));
    }

    /// Train the filter with one peak. Same as [`Self::add_object_peak`].
    pub fn train(&mut self, peak: Peak) {
        log_trace!(
            "Descatter train: {} mm, confidence {}",
            peak.distance_mm,
            peak.confidence
        );

        if !peak.is_valid() {
            return;
        }

        // Linear threshold. Change if the confidence metric is not linear.
        let scaled = self.config.threshold.scale(peak.confidence);
        let window = self
            .geometry
            .window(peak.distance_mm, self.config.max_scatter_distance_mm);

        for bin in &mut self.bins[window] {
            if *bin < scaled {
                *bin = scaled;
            }
        }
    }

    /// Train the filter with every peak, without resetting first
    pub fn train_all<I>(&mut self, peaks: I)
    where
        I: IntoIterator,
        I::Item: Into<Peak>,
    {
        for peak in peaks {
            self.train(peak.into());
        }
    }

    /// Whether a peak lies inside the learned scatter envelope.
    ///
    /// Call after all peaks of the frame have been trained. Returns `true` if
    /// the peak is a scatter peak and can be removed from the results. Ties
    /// count as scattering. Peaks at or beyond the modeled range are never
    /// scattering.
    pub fn is_scattering_peak(&self, distance_mm: u16, confidence: u16) -> bool {
        log_trace!("Descatter query: {} mm, confidence {}", distance_mm, confidence);

        self.envelope_at(distance_mm)
            .map_or(false, |level| confidence <= level)
    }

    /// Whether a peak lies inside the learned scatter envelope
    pub fn is_scattering(&self, peak: Peak) -> bool {
        self.is_scattering_peak(peak.distance_mm, peak.confidence)
    }

    /// Envelope value a peak of `confidence` would cast on its neighbours
    pub fn scaled_confidence(&self, confidence: u16) -> u16 {
        self.config.threshold.scale(confidence)
    }

    /// Learned envelope at `distance_mm`, `None` outside the modeled range
    pub fn envelope_at(&self, distance_mm: u16) -> Option<u16> {
        self.geometry
            .bin_index(distance_mm)
            .and_then(|index| self.bins.get(index).copied())
    }

    /// All bins, in scaled-confidence units
    pub fn bins(&self) -> &[u16] {
        &self.bins
    }

    /// True if nothing has been learned since the last reset
    pub fn is_clear(&self) -> bool {
        self.bins.iter().all(|&bin| bin == 0)
    }

    /// Current configuration
    pub fn config(&self) -> DescatterConfig {
        self.config
    }

    /// Histogram layout
    pub fn geometry(&self) -> BinGeometry {
        self.geometry
    }

    /// First distance that is no longer modeled (mm)
    pub fn max_distance_mm(&self) -> u32 {
        self.geometry.max_distance_mm()
    }
}

impl<const BINS: usize> fmt::Debug for ScatterFilter<BINS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterFilter")
            .field("config", &self.config)
            .field("geometry", &self.geometry)
            .field("raised_bins", &self.bins.iter().filter(|&&bin| bin != 0).count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_DISTANCE_MM;

    fn configured(percent: u8, max_scatter_distance_mm: u16) -> ScatterFilter {
        let mut filter = ScatterFilter::new();
        filter.configure(percent, max_scatter_distance_mm);
        filter
    }

    #[test]
    fn fresh_filter_is_clear() {
        let filter = ScatterFilter::new();
        assert!(filter.is_clear());
        assert_eq!(filter.bins().len(), 1250);
        assert_eq!(filter.max_distance_mm(), MAX_DISTANCE_MM);
    }

    #[test]
    fn unconfigured_filter_learns_nothing() {
        let mut filter = ScatterFilter::new();
        filter.add_object_peak(1000, u16::MAX);
        assert!(filter.is_clear());
    }

    #[test]
    fn ghost_next_to_real_peak() {
        let mut filter = configured(50, 40);
        filter.reset();
        filter.add_object_peak(1000, 1000);

        assert_eq!(filter.envelope_at(1010), Some(500));
        assert!(filter.is_scattering_peak(1010, 400));
        assert!(!filter.is_scattering_peak(1010, 600));
        assert!(!filter.is_scattering_peak(2000, 1));
    }

    #[test]
    fn ties_are_scattering() {
        let mut filter = configured(50, 40);
        filter.add_object_peak(1000, 1000);
        assert!(filter.is_scattering_peak(990, 500));
        assert!(!filter.is_scattering_peak(990, 501));
    }

    #[test]
    fn reset_clears_envelope() {
        let mut filter = configured(50, 40);
        filter.add_object_peak(1000, 1000);
        assert!(!filter.is_clear());

        filter.reset();
        assert!(filter.is_clear());
        assert!(!filter.is_scattering_peak(1000, 1));
        // configuration survives the reset
        assert_eq!(filter.config(), DescatterConfig::new(50, 40));
    }

    #[test]
    fn configure_clears_envelope() {
        let mut filter = configured(50, 40);
        filter.add_object_peak(1000, 1000);

        filter.configure(30, 16);
        assert!(filter.is_clear());
        assert_eq!(filter.config(), DescatterConfig::new(30, 16));
    }

    #[test]
    fn configure_clamps_percent() {
        let filter = configured(200, 40);
        assert_eq!(filter.config().threshold.to_bits(), 64_845);
    }

    #[test]
    fn zero_confidence_is_ignored() {
        let mut filter = configured(99, 400);
        filter.add_object_peak(1000, 0);
        assert!(filter.is_clear());

        filter.train(Peak::new(1000, 0));
        filter.train_all([Peak::new(500, 0), Peak::new(9000, 0)]);
        assert!(filter.is_clear());
    }

    #[test]
    fn zero_confidence_query_is_scattering_in_range() {
        // 0 <= empty bin; only beyond the modeled range is it "real"
        let filter = configured(50, 40);
        assert!(filter.is_scattering_peak(1000, 0));
        assert!(!filter.is_scattering_peak(10_000, 0));
    }

    #[test]
    fn upper_window_bin_is_not_trained() {
        let mut filter = configured(50, 40);
        filter.add_object_peak(1000, 1000);

        // window [960, 1040] mm -> bins 120..130
        let bins = filter.bins();
        assert_eq!(bins[119], 0);
        assert_eq!(bins[120], 500);
        assert_eq!(bins[129], 500);
        assert_eq!(bins[130], 0);

        // 1040 mm is inside the nominal window but its bin was skipped
        assert!(!filter.is_scattering_peak(1040, 1));
        assert!(filter.is_scattering_peak(960, 1));
    }

    #[test]
    fn last_bin_is_never_trained() {
        let mut filter = configured(50, 400);
        filter.add_object_peak(9_999, 1000);
        assert_eq!(filter.bins()[1248], 500);
        assert_eq!(filter.bins()[1249], 0);
    }

    #[test]
    fn envelope_keeps_the_maximum() {
        let mut filter = configured(50, 40);
        filter.add_object_peak(1000, 1000);
        filter.add_object_peak(1000, 200);
        assert_eq!(filter.envelope_at(1000), Some(500));

        // 50% is 32750 in Q0.16 (655 per percent), so 2000 scales to 999
        filter.add_object_peak(1000, 2000);
        assert_eq!(filter.scaled_confidence(2000), 999);
        assert_eq!(filter.envelope_at(1000), Some(999));
    }

    #[test]
    fn beyond_modeled_range_is_real() {
        let mut filter = configured(99, u16::MAX);
        filter.add_object_peak(5000, u16::MAX);

        assert!(filter.is_scattering_peak(9_990, 1));
        // last bin sits at the exclusive end of every clamped window
        assert!(!filter.is_scattering_peak(9_999, 1));
        assert!(!filter.is_scattering_peak(10_000, 1));
        assert!(!filter.is_scattering_peak(u16::MAX, 1));
        assert_eq!(filter.envelope_at(10_000), None);
    }

    #[test]
    fn far_peak_trains_nothing() {
        let mut filter = configured(50, 40);
        filter.add_object_peak(20_000, 1000);
        assert!(filter.is_clear());
    }

    #[test]
    fn interleaved_query_sees_partial_envelope() {
        // Querying mid-training is allowed; it just sees less
        let mut filter = configured(50, 40);
        filter.add_object_peak(1000, 400);
        assert!(!filter.is_scattering_peak(1010, 300));

        filter.add_object_peak(1000, 1000);
        assert!(filter.is_scattering_peak(1010, 300));
    }

    #[test]
    fn custom_geometry() {
        let mut filter = ScatterFilter::<100>::with_bin_width(16).unwrap();
        assert_eq!(filter.max_distance_mm(), 1600);

        filter.configure(50, 32);
        filter.add_object_peak(800, 1000);
        // [768, 832] mm -> bins 48..52
        assert_eq!(filter.bins()[48], 500);
        assert_eq!(filter.bins()[51], 500);
        assert_eq!(filter.bins()[52], 0);
        assert!(!filter.is_scattering_peak(1600, 1));
    }

    #[test]
    fn with_config_applies_settings() {
        let filter =
            ScatterFilter::<1250>::with_config(8, DescatterConfig::narrow_window()).unwrap();
        assert_eq!(filter.config(), DescatterConfig::narrow_window());
        assert!(filter.is_clear());
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        assert!(ScatterFilter::<1250>::with_bin_width(0).is_err());
        assert!(ScatterFilter::<0>::with_bin_width(8).is_err());
    }

    #[test]
    fn train_all_accepts_tuples() {
        let mut filter = configured(50, 40);
        filter.train_all([(1000u16, 1000u16), (3000, 800)]);
        assert_eq!(filter.envelope_at(1000), Some(500));
        assert_eq!(filter.envelope_at(3000), Some(400));
    }
}
