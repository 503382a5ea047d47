use ndarray::Array3;
use sht_core::{CoeffGrid, ShtError};

use crate::gauss::gauss_degree_weights;

/// Builds the fan weighting grid `W_lm = W_l * W_m` from the Gaussian sequence.
pub fn fan_weights(lmax: usize, radius: f64) -> Result<CoeffGrid, ShtError> {
    let w = gauss_degree_weights(lmax, radius)?;
    Ok(Array3::from_shape_fn((2, lmax + 1, lmax + 1), |(_, l, m)| {
        w[l] * w[m]
    }))
}
