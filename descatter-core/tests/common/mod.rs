//! Common test utilities for integration tests
//!
//! Provides a synthetic ToF frame generator: well separated real objects, each
//! followed by ghost peaks placed inside its scatter window and weaker than
//! its envelope. Because the layout is controlled, every generated frame has a
//! known ground truth.

#![allow(dead_code)]

use descatter_core::{DescatterConfig, Peak};

/// Spacing between real objects, wide enough that windows never overlap
pub const OBJECT_SPACING_MM: u16 = 1000;

/// First real object distance
pub const FIRST_OBJECT_MM: u16 = 500;

/// One generated frame with its ground truth
pub struct SyntheticFrame {
    /// All peaks in arrival order (objects and ghosts interleaved)
    pub peaks: Vec<Peak>,
    /// Peaks that must survive filtering
    pub objects: Vec<Peak>,
    /// Peaks that must be suppressed
    pub ghosts: Vec<Peak>,
}

/// Pseudo-random frame generator
pub struct FrameGenerator {
    config: DescatterConfig,
    bin_width_mm: u16,
    seed: u32,
}

impl FrameGenerator {
    /// Create generator for a configuration and bin width
    pub fn new(config: DescatterConfig, bin_width_mm: u16) -> Self {
        assert!(
            config.max_scatter_distance_mm >= bin_width_mm,
            "window narrower than a bin cannot hold ghosts"
        );
        assert!(
            config.max_scatter_distance_mm * 2 < OBJECT_SPACING_MM,
            "windows would overlap"
        );
        Self {
            config,
            bin_width_mm,
            seed: 42,
        }
    }

    /// Generate a frame with `objects` real peaks and `ghosts_per_object`
    /// ghosts each. Objects stay below 10 m.
    pub fn frame(&mut self, objects: u16, ghosts_per_object: usize) -> SyntheticFrame {
        assert!(FIRST_OBJECT_MM + objects * OBJECT_SPACING_MM <= 10_000);

        let mut frame = SyntheticFrame {
            peaks: Vec::new(),
            objects: Vec::new(),
            ghosts: Vec::new(),
        };

        let m = self.config.max_scatter_distance_mm as i32;
        let w = self.bin_width_mm as i32;

        for k in 0..objects {
            let distance = FIRST_OBJECT_MM + k * OBJECT_SPACING_MM;
            // Strong enough that its own envelope stays below it
            let confidence = self.random_int(200, 4000) as u16;
            let object = Peak::new(distance, confidence);
            frame.objects.push(object);
            frame.peaks.push(object);

            let envelope = self.config.threshold.scale(confidence);
            for _ in 0..ghosts_per_object {
                // [d - m, d + m - w] always lands in a trained bin
                let offset = self.random_int(0, (2 * m - w) as u32) as i32 - m;
                let ghost_distance = (distance as i32 + offset) as u16;
                let ghost_confidence = self.random_int(1, envelope as u32) as u16;

                let ghost = Peak::new(ghost_distance, ghost_confidence);
                frame.ghosts.push(ghost);
                frame.peaks.push(ghost);
            }
        }

        frame
    }

    fn random_float(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.seed as f32) / (u32::MAX as f32)
    }

    /// Uniform in `[min, max]`
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        let range = max - min + 1;
        (min + (self.random_float() * range as f32) as u32).min(max)
    }
}
