//! Peak value type handed in by the ranging pipeline

/// One candidate object detection
///
/// `confidence` is whatever monotonic strength metric the ranging pipeline
/// produces (SNR, signal amplitude, histogram weight...). The filter only
/// compares and scales it, so the unit does not matter as long as it is the
/// same for training and queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Peak {
    /// Object distance in mm
    pub distance_mm: u16,

    /// Object strength; zero marks an invalid object
    pub confidence: u16,
}

impl Peak {
    /// Create a peak
    pub const fn new(distance_mm: u16, confidence: u16) -> Self {
        Self {
            distance_mm,
            confidence,
        }
    }

    /// Zero confidence peaks carry no information and are never trained
    pub const fn is_valid(&self) -> bool {
        self.confidence != 0
    }
}

impl From<(u16, u16)> for Peak {
    fn from((distance_mm, confidence): (u16, u16)) -> Self {
        Self::new(distance_mm, confidence)
    }
}
