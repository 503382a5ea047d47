use ndarray::{Array4, ArrayView4};
use sht_core::{CoeffBatch, ErrorInfo, LoadLoveNumbers, Quantity, ShtError, SpharmUnit};

use crate::constants::{EARTH_RADIUS_M, RHO_EARTH, RHO_WATER};
use crate::love::wahr1998_k;

fn love_too_short(have: usize, lmax: usize) -> ShtError {
    ShtError::Parameter(
        ErrorInfo::new(
            "love-number-degree",
            format!("load Love numbers cover {have} degrees, {} required", lmax + 1),
        )
        .with_context("lmax", lmax.to_string()),
    )
}

/// Returns the per-degree factor that converts stokes coefficients into `unit`.
pub fn degree_factors(
    unit: SpharmUnit,
    lmax: usize,
    love: Option<&LoadLoveNumbers>,
) -> Result<Vec<f64>, ShtError> {
    if let Some(love) = love {
        if love.len() <= lmax {
            return Err(love_too_short(love.len(), lmax));
        }
    }
    let k_el = match love {
        Some(love) => love.k_el[..=lmax].to_vec(),
        None => wahr1998_k(lmax),
    };
    let (quantity, scale) = unit.quantity();

    let factors = match quantity {
        Quantity::Potential => vec![1.0; lmax + 1],
        Quantity::Geoid => vec![EARTH_RADIUS_M * scale; lmax + 1],
        Quantity::WaterHeight => (0..=lmax)
            .map(|l| {
                EARTH_RADIUS_M * RHO_EARTH / (3.0 * RHO_WATER) * (2 * l + 1) as f64
                    / (1.0 + k_el[l])
                    * scale
            })
            .collect(),
        Quantity::Mass => (0..=lmax)
            .map(|l| EARTH_RADIUS_M * RHO_EARTH / 3.0 * (2 * l + 1) as f64 / (1.0 + k_el[l]) * scale)
            .collect(),
        Quantity::Uplift => {
            let love = love.ok_or_else(|| {
                ShtError::Parameter(
                    ErrorInfo::new(
                        "love-number-missing",
                        format!("conversion to or from <{unit}> requires load Love numbers"),
                    )
                    .with_hint("pass LoadLoveNumbers including h_el"),
                )
            })?;
            (0..=lmax)
                .map(|l| EARTH_RADIUS_M * love.h_el[l] / (1.0 + k_el[l]) * scale)
                .collect()
        }
    };
    Ok(factors)
}

/// Converts a coefficient batch `[epoch, cs, degree, order]` from `from` to `to`.
///
/// Non-stokes pairs are converted through stokes. Degrees whose source factor is
/// zero carry no information in the source unit and convert to zero.
pub fn convert(
    coeffs: ArrayView4<'_, f64>,
    from: SpharmUnit,
    to: SpharmUnit,
    love: Option<&LoadLoveNumbers>,
) -> Result<CoeffBatch, ShtError> {
    let (_, cs, degrees, orders) = coeffs.dim();
    if cs != 2 || degrees == 0 || degrees != orders {
        let info = ErrorInfo::new(
            "convert-shape",
            format!("coefficient batch shape {:?} is not [n, 2, L+1, L+1]", coeffs.shape()),
        );
        return Err(ShtError::Shape(info));
    }
    if from == to {
        return Ok(coeffs.to_owned());
    }

    let lmax = degrees - 1;
    let from_factors = degree_factors(from, lmax, love)?;
    let to_factors = degree_factors(to, lmax, love)?;
    let ratio: Vec<f64> = from_factors
        .iter()
        .zip(&to_factors)
        .map(|(&f, &t)| if f == 0.0 { 0.0 } else { t / f })
        .collect();

    let mut out: Array4<f64> = coeffs.to_owned();
    for ((_, _, degree, _), value) in out.indexed_iter_mut() {
        *value *= ratio[degree];
    }
    Ok(out)
}
