#![deny(missing_docs)]
#![doc = "Degree/order weighting kernels used to smooth spherical-harmonic coefficient grids."]

/// Fan (degree and order) kernel weights.
pub mod fan;
/// Isotropic Gaussian kernel weights.
pub mod gauss;

use sht_core::{CoeffGrid, FilterKernel, ShtError, SmoothKind};

pub use fan::fan_weights;
pub use gauss::{gauss_degree_weights, gauss_weights, EARTH_RADIUS_KM};

/// Default [`FilterKernel`] dispatching on the kernel family.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFilter;

impl FilterKernel for StandardFilter {
    fn weights(&self, kind: SmoothKind, lmax: usize, radius: f64) -> Result<CoeffGrid, ShtError> {
        match kind {
            SmoothKind::Gauss => gauss_weights(lmax, radius),
            SmoothKind::Fan => fan_weights(lmax, radius),
        }
    }
}
