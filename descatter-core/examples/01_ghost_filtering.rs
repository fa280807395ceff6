//! Ghost Peak Filtering Example
//!
//! A ToF sensor behind a cover glass sees a hand at 1 m. Reflections between
//! the glass and the lens add two weaker phantom peaks a few centimetres away.
//! The descatter filter learns the envelope of the real echo and flags the
//! phantoms.
//!
//! ## What You'll Learn
//!
//! - Configuring the threshold and scatter window
//! - The per-frame reset / train / query cycle
//! - Processing a whole frame in one call
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_ghost_filtering
//! ```

use descatter_core::{DescatterConfig, Peak, ScatterFilter};

fn main() {
    println!("Descatter Ghost Filtering Example");
    println!("=================================\n");

    let mut filter = ScatterFilter::new();
    filter.apply_config(DescatterConfig::narrow_window());

    let config = filter.config();
    println!("Filter configuration:");
    println!("  Threshold: {} (Q0.16)", config.threshold.to_bits());
    println!("  Max scatter distance: ±{} mm", config.max_scatter_distance_mm);
    println!("  Modeled range: 0..{} mm", filter.max_distance_mm());
    println!();

    // One frame as delivered by the peak extractor
    let frame = [
        Peak::new(1000, 1000), // hand
        Peak::new(1024, 310),  // phantom behind it
        Peak::new(978, 120),   // phantom in front of it
        Peak::new(3150, 95),   // weak but real background object
    ];

    // Step by step
    filter.reset();
    for peak in &frame {
        filter.train(*peak);
    }

    println!("Classifying peaks:\n");
    for peak in &frame {
        let verdict = if filter.is_scattering(*peak) {
            "ghost"
        } else {
            "object"
        };
        println!(
            "  {:5} mm  confidence {:5}  envelope {:5}  -> {}",
            peak.distance_mm,
            peak.confidence,
            filter.envelope_at(peak.distance_mm).unwrap_or(0),
            verdict
        );
    }

    // Same frame in one call
    match filter.process_frame::<8>(&frame) {
        Ok(report) => {
            println!(
                "\nFrame helper: kept {}, suppressed {}",
                report.kept().len(),
                report.suppressed_count()
            );
        }
        Err(e) => println!("\nFrame helper failed: {}", e),
    }
}
