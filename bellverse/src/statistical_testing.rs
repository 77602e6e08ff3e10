//! Test utilities for statistical assertions on sampled trial counts.
//!
//! Standard thresholds:
//! - ±4σ binomial band for fixed-seed counts, which a correct sampler leaves about once
//!   in 15 000 seeds
//! - ±5% relative tolerance for high sample counts (≥10K trials)

/// Relative tolerance for tests with ≥10K trials.
pub const TOLERANCE_HIGH_SAMPLES: f64 = 0.05;

/// Width of the binomial band, in standard deviations.
pub const BINOMIAL_SIGMAS: f64 = 4.0;

/// Assert that `observed` successes out of `total` trials lie within `sigmas` standard
/// deviations of the binomial mean `total * probability`.
///
/// # Panics
/// Panics if the count falls outside the band.
#[allow(clippy::cast_precision_loss)]
pub fn assert_within_binomial_band(observed: usize, total: usize, probability: f64, sigmas: f64, context: &str) {
    let mean = total as f64 * probability;
    let deviation = (total as f64 * probability * (1.0 - probability)).sqrt();
    let distance = (observed as f64 - mean).abs();
    assert!(
        distance <= sigmas * deviation,
        "{context}: observed {observed} of {total}, expected {mean:.1} ± {:.1} ({sigmas}σ)",
        sigmas * deviation
    );
}

/// Assert that the observed event rate matches the expected probability within tolerance.
///
/// # Panics
/// Panics if the observed rate deviates from expected by more than the tolerance.
#[allow(clippy::cast_precision_loss)]
pub fn assert_rate_within_tolerance(
    observed: usize,
    total: usize,
    expected_probability: f64,
    relative_tolerance: f64,
    context: &str,
) {
    let observed_rate = observed as f64 / total as f64;
    let lower = expected_probability * (1.0 - relative_tolerance);
    let upper = expected_probability * (1.0 + relative_tolerance);
    assert!(
        (lower..upper).contains(&observed_rate),
        "{context}: observed rate {observed_rate:.4} deviates from expected \
         {expected_probability:.4} by more than {:.0}%",
        relative_tolerance * 100.0
    );
}
