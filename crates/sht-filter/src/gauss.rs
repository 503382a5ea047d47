use std::f64::consts::{LN_2, PI};

use ndarray::Array3;
use sht_core::{CoeffGrid, ErrorInfo, ShtError};

/// Semi-major axis of the reference ellipsoid in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.1363;

/// Weights below this value end the recursion; higher degrees are zeroed.
const CUTOFF: f64 = 1e-10;

pub(crate) fn validate_radius(radius: f64) -> Result<(), ShtError> {
    if !radius.is_finite() || radius < 0.0 || radius >= PI * EARTH_RADIUS_KM {
        let info = ErrorInfo::new(
            "invalid-radius",
            format!("invalid smoothing radius <{radius}>, must lie in [0, pi * a) km"),
        )
        .with_context("radius", radius.to_string());
        return Err(ShtError::Parameter(info));
    }
    Ok(())
}

/// Returns the Gaussian weight for each degree `0..=lmax`, normalised so `W0 = 1`.
///
/// The weights follow the Jekeli recursion with `b = ln 2 / (1 - cos(r / a))`.
/// A radius of zero disables smoothing (all weights one).
pub fn gauss_degree_weights(lmax: usize, radius: f64) -> Result<Vec<f64>, ShtError> {
    validate_radius(radius)?;
    if radius == 0.0 {
        return Ok(vec![1.0; lmax + 1]);
    }

    let mut weights = vec![0.0; lmax + 1];
    weights[0] = 1.0;
    if lmax == 0 {
        return Ok(weights);
    }

    let b = LN_2 / (1.0 - (radius / EARTH_RADIUS_KM).cos());
    let decay = (-2.0 * b).exp();
    let w1 = (1.0 + decay) / (1.0 - decay) - 1.0 / b;
    if w1 < CUTOFF {
        return Ok(weights);
    }
    weights[1] = w1;

    for degree in 1..lmax {
        let next = -((2 * degree + 1) as f64) / b * weights[degree] + weights[degree - 1];
        // Past rounding noise the recursion stops decreasing.
        if next < CUTOFF || next > weights[degree] {
            break;
        }
        weights[degree + 1] = next;
    }
    Ok(weights)
}

/// Builds the `(2, lmax + 1, lmax + 1)` Gaussian weighting grid.
pub fn gauss_weights(lmax: usize, radius: f64) -> Result<CoeffGrid, ShtError> {
    let degree_weights = gauss_degree_weights(lmax, radius)?;
    Ok(Array3::from_shape_fn((2, lmax + 1, lmax + 1), |(_, l, _)| {
        degree_weights[l]
    }))
}
