#![deny(missing_docs)]
#![doc = "Conversion of spherical-harmonic coefficient batches between stokes and surface load units."]

/// Reference constants of the conversion model.
pub mod constants;
/// Degree factors and batch conversion.
pub mod convert;
/// Default load Love number table.
pub mod love;

use ndarray::ArrayView4;
use sht_core::{CoeffBatch, LoadLoveNumbers, ShtError, SpharmUnit, UnitConverter};

pub use convert::{convert, degree_factors};
pub use love::wahr1998_k;

/// Default [`UnitConverter`] backed by [`convert`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConverter;

impl UnitConverter for StandardConverter {
    fn convert(
        &self,
        coeffs: ArrayView4<'_, f64>,
        from: SpharmUnit,
        to: SpharmUnit,
        love: Option<&LoadLoveNumbers>,
    ) -> Result<CoeffBatch, ShtError> {
        convert(coeffs, from, to, love)
    }
}
