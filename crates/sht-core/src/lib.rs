#![deny(missing_docs)]
#![doc = "Core error, unit and collaborator types shared by the SHT coefficient-series crates."]

use std::path::Path;

use ndarray::{Array2, Array3, Array4, ArrayView3, ArrayView4};

pub mod errors;
pub mod provenance;
mod types;

pub use errors::{ErrorInfo, ShtError};
pub use provenance::{append_entry, SchemaVersion};
pub use types::{
    CorrectionMode, GiaModel, LoadLoveNumbers, LowDegreeKind, Quantity, SmoothKind, SpharmUnit,
};

/// Single coefficient grid indexed `[cs, degree, order]`.
pub type CoeffGrid = Array3<f64>;

/// Batch of coefficient grids indexed `[epoch, cs, degree, order]`.
pub type CoeffBatch = Array4<f64>;

/// One epoch worth of coefficients produced by a [`CoefficientLoader`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecord {
    /// Decimal-year centre epoch of the solution.
    pub epoch: f64,
    /// Coefficient grid of shape `(2, lmax + 1, lmax + 1)`.
    pub coeffs: CoeffGrid,
    /// Error grid with the same shape as `coeffs`, when the product ships one.
    pub errors: Option<CoeffGrid>,
}

/// Substitute low-degree values read from an independent tracking product.
#[derive(Debug, Clone, PartialEq)]
pub struct LowDegreeRecord {
    /// Decimal-year epochs of the substitute values.
    pub epochs: Vec<f64>,
    /// Substitute values, one row per epoch and one column per replaced cell.
    pub values: Array2<f64>,
    /// Optional uncertainties with the same shape as `values`.
    pub errors: Option<Array2<f64>>,
    /// Processing centre label recorded in provenance trails.
    pub center: String,
}

/// Reads a single coefficient file truncated to `lmax`.
pub trait CoefficientLoader: Send + Sync {
    /// Loads the coefficients stored at `path`.
    fn load(&self, path: &Path, lmax: usize) -> Result<LoadedRecord, ShtError>;
}

/// Provides per-year secular trend grids for named GIA models.
pub trait TrendModelSource {
    /// Returns the trend grid of shape `(2, lmax + 1, lmax + 1)` in stokes per year.
    fn trend(&self, lmax: usize, model: GiaModel) -> Result<CoeffGrid, ShtError>;
}

/// Provides substitute low-degree coefficient series.
pub trait LowDegreeSource {
    /// Reads the substitute series for the requested coefficient family.
    fn read(&self, kind: LowDegreeKind) -> Result<LowDegreeRecord, ShtError>;
}

/// Produces degree/order weighting grids for spectral smoothing.
pub trait FilterKernel {
    /// Returns a weighting grid of shape `(2, lmax + 1, lmax + 1)`.
    fn weights(&self, kind: SmoothKind, lmax: usize, radius: f64) -> Result<CoeffGrid, ShtError>;
}

/// Converts coefficient batches between physical units.
pub trait UnitConverter {
    /// Converts `coeffs` from `from` to `to`, optionally using load Love numbers.
    fn convert(
        &self,
        coeffs: ArrayView4<'_, f64>,
        from: SpharmUnit,
        to: SpharmUnit,
        love: Option<&LoadLoveNumbers>,
    ) -> Result<CoeffBatch, ShtError>;
}

/// Expands one coefficient grid into a regular latitude/longitude grid.
pub trait GridExpander {
    /// Returns a `(lat, lon)` grid at the requested resolution in degrees.
    fn expand(
        &self,
        cilm: ArrayView3<'_, f64>,
        resolution: f64,
        lmax_calc: Option<usize>,
    ) -> Result<Array2<f64>, ShtError>;
}
