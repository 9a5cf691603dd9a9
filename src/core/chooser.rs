//! Weighted index selection.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

/// Pick an index from `weights` by cumulative-weight sampling.
///
/// Zero-weight entries are never selected. Returns `None` for degenerate
/// input: an empty slice, all weights zero, or any weight that is
/// negative, NaN or infinite.
pub fn pick_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.iter().any(|w| !w.is_finite()) {
        return None;
    }
    let dist = WeightedIndex::new(weights).ok()?;
    Some(dist.sample(rng))
}
