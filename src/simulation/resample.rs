//! Historical-return resampling
//!
//! Each trial experiences the full historical record in a random order: a
//! permutation, not sampling with replacement, so every trial sees exactly
//! the record's mean, variance, and multiset of returns.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SimulationError;

/// Produce one random permutation of the historical record.
///
/// The length check runs before any index is consumed; a record shorter
/// than the horizon can never fail mid-trial with an out-of-range read.
pub fn resample<R: Rng>(
    series: &[f64],
    target_years: u32,
    rng: &mut R,
) -> Result<Vec<f64>, SimulationError> {
    if series.len() < target_years as usize {
        return Err(SimulationError::InsufficientHistoricalData {
            required: target_years as usize,
            available: series.len(),
        });
    }

    let mut shuffled = series.to_vec();
    shuffled.shuffle(rng);
    Ok(shuffled)
}
