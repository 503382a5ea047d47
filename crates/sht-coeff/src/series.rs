//! The coefficient-series container.
//!
//! A [`SpharmCoeff`] holds a batch of coefficient grids `[epoch, cs, degree, order]`
//! together with their epochs, optional error grids, unit tag and provenance
//! trail. Every transformation returns a new series built through
//! [`SpharmCoeff::with_fields`], which re-validates the shape contract and
//! re-derives `lmax`.

use std::ops::Range;

use ndarray::{Array3, ArrayD, ArrayView3, Axis, Ix3, Ix4};
use sht_core::{
    CoeffBatch, ErrorInfo, FilterKernel, LoadLoveNumbers, LoadedRecord, ShtError, SmoothKind,
    SpharmUnit, UnitConverter,
};
use sht_filter::StandardFilter;
use sht_units::StandardConverter;

fn shape_error(code: &str, message: impl Into<String>) -> ShtError {
    ShtError::Shape(ErrorInfo::new(code, message))
}

/// Owned fields of a series, used to construct or rebuild one.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesParts {
    /// Coefficient batch `[epoch, cs, degree, order]`.
    pub coeffs: CoeffBatch,
    /// Decimal-year epochs, one per grid.
    pub epochs: Vec<f64>,
    /// Unit of the coefficients.
    pub unit: SpharmUnit,
    /// Error batch with the same shape as `coeffs`.
    pub errors: Option<CoeffBatch>,
    /// Free-form description of what the error grids represent.
    pub error_kind: Option<String>,
    /// Append-only provenance trail.
    pub name: Option<String>,
}

impl SeriesParts {
    /// Creates parts without errors, error kind or provenance.
    pub fn new(coeffs: CoeffBatch, epochs: Vec<f64>, unit: SpharmUnit) -> Self {
        Self {
            coeffs,
            epochs,
            unit,
            errors: None,
            error_kind: None,
            name: None,
        }
    }

    /// Attaches an error batch.
    pub fn with_errors(mut self, errors: CoeffBatch) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Sets the error kind descriptor.
    pub fn with_error_kind(mut self, error_kind: impl Into<String>) -> Self {
        self.error_kind = Some(error_kind.into());
        self
    }

    /// Starts a provenance trail.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Field overrides applied by [`SpharmCoeff::with_fields`].
///
/// `None` keeps the base value. The nested options on `errors`, `error_kind`
/// and `name` allow clearing a field with `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct SeriesOverrides {
    /// Replacement coefficient batch.
    pub coeffs: Option<CoeffBatch>,
    /// Replacement epochs.
    pub epochs: Option<Vec<f64>>,
    /// Replacement unit.
    pub unit: Option<SpharmUnit>,
    /// Replacement error batch.
    pub errors: Option<Option<CoeffBatch>>,
    /// Replacement error kind.
    pub error_kind: Option<Option<String>>,
    /// Replacement provenance trail.
    pub name: Option<Option<String>>,
}

/// Time-indexed batch of spherical-harmonic coefficient grids.
#[derive(Debug, Clone, PartialEq)]
pub struct SpharmCoeff {
    parts: SeriesParts,
    lmax: usize,
}

impl SpharmCoeff {
    /// Validates `parts` and derives `lmax`.
    ///
    /// The batch must be `[n, 2, L + 1, L + 1]` with `n >= 1`, the epoch count
    /// must equal `n`, and an error batch, when present, must match exactly.
    pub fn from_parts(parts: SeriesParts) -> Result<Self, ShtError> {
        let (count, cs, degrees, orders) = parts.coeffs.dim();
        if count == 0 {
            return Err(shape_error("empty-series", "a series must hold at least one epoch"));
        }
        if cs != 2 || degrees == 0 || degrees != orders {
            let info = ErrorInfo::new(
                "grid-shape",
                format!(
                    "invalid shape of 'coeffs' {:?}, must be [n, 2, lmax + 1, lmax + 1]",
                    parts.coeffs.shape()
                ),
            );
            return Err(ShtError::Shape(info));
        }
        if parts.epochs.len() != count {
            let info = ErrorInfo::new(
                "epoch-count",
                format!(
                    "the number of 'coeffs' {count} is unequal to that of 'epochs' {}",
                    parts.epochs.len()
                ),
            );
            return Err(ShtError::Shape(info));
        }
        if let Some(errors) = &parts.errors {
            if errors.shape() != parts.coeffs.shape() {
                let info = ErrorInfo::new(
                    "errors-shape",
                    format!(
                        "the shape of 'coeffs' {:?} is unequal to that of 'errors' {:?}",
                        parts.coeffs.shape(),
                        errors.shape()
                    ),
                );
                return Err(ShtError::Shape(info));
            }
        }
        Ok(Self {
            lmax: degrees - 1,
            parts,
        })
    }

    /// Builds a length-one series from a single grid.
    pub fn from_grid(grid: Array3<f64>, epoch: f64, unit: SpharmUnit) -> Result<Self, ShtError> {
        Self::from_parts(SeriesParts::new(
            grid.insert_axis(Axis(0)),
            vec![epoch],
            unit,
        ))
    }

    /// Builds a series from an array of rank 3 (single grid) or rank 4 (batch).
    pub fn from_dyn(
        coeffs: ArrayD<f64>,
        epochs: Vec<f64>,
        unit: SpharmUnit,
        errors: Option<ArrayD<f64>>,
    ) -> Result<Self, ShtError> {
        if let Some(errors) = &errors {
            if errors.shape() != coeffs.shape() {
                let info = ErrorInfo::new(
                    "errors-shape",
                    format!(
                        "the shape of 'coeffs' {:?} is unequal to that of 'errors' {:?}",
                        coeffs.shape(),
                        errors.shape()
                    ),
                );
                return Err(ShtError::Shape(info));
            }
        }
        let promote = |array: ArrayD<f64>| -> Result<CoeffBatch, ShtError> {
            match array.ndim() {
                4 => array
                    .into_dimensionality::<Ix4>()
                    .map_err(|err| shape_error("grid-rank", err.to_string())),
                3 => array
                    .into_dimensionality::<Ix3>()
                    .map(|grid| grid.insert_axis(Axis(0)))
                    .map_err(|err| shape_error("grid-rank", err.to_string())),
                ndim => Err(shape_error(
                    "grid-rank",
                    format!("invalid ndim of 'coeffs' {ndim}, must be 4 or 3"),
                )),
            }
        };
        let mut parts = SeriesParts::new(promote(coeffs)?, epochs, unit);
        parts.errors = errors.map(promote).transpose()?;
        Self::from_parts(parts)
    }

    /// Assembles loader records in the given order.
    ///
    /// Either every record carries errors or none does; a mixture is rejected.
    pub fn from_records(records: Vec<LoadedRecord>, unit: SpharmUnit) -> Result<Self, ShtError> {
        let first = records
            .first()
            .ok_or_else(|| shape_error("empty-series", "no records to assemble"))?;
        let dim = first.coeffs.dim();
        let with_errors = records.iter().filter(|r| r.errors.is_some()).count();
        if with_errors != 0 && with_errors != records.len() {
            let info = ErrorInfo::new(
                "partial-errors",
                "errors must be present for every record or for none",
            )
            .with_context("with_errors", with_errors.to_string())
            .with_context("records", records.len().to_string());
            return Err(ShtError::Shape(info));
        }

        let count = records.len();
        let mut epochs = Vec::with_capacity(count);
        let mut coeffs = CoeffBatch::zeros((count, dim.0, dim.1, dim.2));
        let mut errors = (with_errors > 0).then(|| CoeffBatch::zeros((count, dim.0, dim.1, dim.2)));
        for (row, record) in records.into_iter().enumerate() {
            if record.coeffs.dim() != dim {
                let info = ErrorInfo::new(
                    "record-shape",
                    format!(
                        "record {row} has shape {:?}, expected {:?}",
                        record.coeffs.shape(),
                        [dim.0, dim.1, dim.2]
                    ),
                )
                .with_context("epoch", format!("{:.4}", record.epoch));
                return Err(ShtError::Shape(info));
            }
            coeffs.index_axis_mut(Axis(0), row).assign(&record.coeffs);
            if let (Some(batch), Some(grid)) = (errors.as_mut(), record.errors.as_ref()) {
                if grid.dim() != dim {
                    return Err(shape_error(
                        "errors-shape",
                        format!("errors of record {row} do not match its coefficients"),
                    ));
                }
                batch.index_axis_mut(Axis(0), row).assign(grid);
            }
            epochs.push(record.epoch);
        }

        let mut parts = SeriesParts::new(coeffs, epochs, unit);
        parts.errors = errors;
        Self::from_parts(parts)
    }

    /// Copy-with: builds a new series from `self` with the given fields replaced.
    pub fn with_fields(&self, overrides: SeriesOverrides) -> Result<Self, ShtError> {
        let parts = SeriesParts {
            coeffs: overrides
                .coeffs
                .unwrap_or_else(|| self.parts.coeffs.clone()),
            epochs: overrides
                .epochs
                .unwrap_or_else(|| self.parts.epochs.clone()),
            unit: overrides.unit.unwrap_or(self.parts.unit),
            errors: overrides
                .errors
                .unwrap_or_else(|| self.parts.errors.clone()),
            error_kind: overrides
                .error_kind
                .unwrap_or_else(|| self.parts.error_kind.clone()),
            name: overrides.name.unwrap_or_else(|| self.parts.name.clone()),
        };
        Self::from_parts(parts)
    }

    /// Coefficient batch `[epoch, cs, degree, order]`.
    pub fn coeffs(&self) -> &CoeffBatch {
        &self.parts.coeffs
    }

    /// Epochs in decimal years.
    pub fn epochs(&self) -> &[f64] {
        &self.parts.epochs
    }

    /// Unit of the coefficients.
    pub fn unit(&self) -> SpharmUnit {
        self.parts.unit
    }

    /// Error batch, if the series carries one.
    pub fn errors(&self) -> Option<&CoeffBatch> {
        self.parts.errors.as_ref()
    }

    /// Error kind descriptor.
    pub fn error_kind(&self) -> Option<&str> {
        self.parts.error_kind.as_deref()
    }

    /// Provenance trail.
    pub fn name(&self) -> Option<&str> {
        self.parts.name.as_deref()
    }

    /// Maximum spherical-harmonic degree.
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Number of epochs.
    pub fn len(&self) -> usize {
        self.parts.epochs.len()
    }

    /// Always false: a series holds at least one epoch.
    pub fn is_empty(&self) -> bool {
        self.parts.epochs.is_empty()
    }

    /// View of the grid at position `index`.
    pub fn grid(&self, index: usize) -> Option<ArrayView3<'_, f64>> {
        (index < self.len()).then(|| self.parts.coeffs.index_axis(Axis(0), index))
    }

    /// Consumes the series and returns its parts.
    pub fn into_parts(self) -> SeriesParts {
        self.parts
    }

    /// Sub-series made of the given positions, in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Self, ShtError> {
        if let Some(&bad) = indices.iter().find(|&&index| index >= self.len()) {
            let info = ErrorInfo::new(
                "index-out-of-bounds",
                format!("index {bad} is out of bounds for a series of length {}", self.len()),
            );
            return Err(ShtError::Shape(info));
        }
        let epochs = indices.iter().map(|&index| self.parts.epochs[index]).collect();
        self.with_fields(SeriesOverrides {
            coeffs: Some(self.parts.coeffs.select(Axis(0), indices)),
            epochs: Some(epochs),
            errors: Some(
                self.parts
                    .errors
                    .as_ref()
                    .map(|errors| errors.select(Axis(0), indices)),
            ),
            ..SeriesOverrides::default()
        })
    }

    /// Length-one series holding the epoch at `index`.
    pub fn get(&self, index: usize) -> Result<Self, ShtError> {
        self.select(&[index])
    }

    /// Contiguous sub-series.
    pub fn slice(&self, range: Range<usize>) -> Result<Self, ShtError> {
        let indices: Vec<usize> = range.collect();
        self.select(&indices)
    }

    /// Reorders the batch by ascending epoch. Ties keep their relative order.
    pub fn sort(&self) -> Result<Self, ShtError> {
        let epochs = &self.parts.epochs;
        let mut order: Vec<usize> = (0..epochs.len()).collect();
        order.sort_by(|&a, &b| epochs[a].total_cmp(&epochs[b]));
        self.select(&order)
    }

    /// Subtracts the temporal mean grid from every epoch.
    pub fn remove_mean_field(&self) -> Result<Self, ShtError> {
        let mean = self
            .parts
            .coeffs
            .mean_axis(Axis(0))
            .ok_or_else(|| shape_error("empty-series", "cannot average an empty series"))?;
        let mut coeffs = self.parts.coeffs.clone();
        for mut grid in coeffs.outer_iter_mut() {
            grid -= &mean;
        }
        self.with_fields(SeriesOverrides {
            coeffs: Some(coeffs),
            ..SeriesOverrides::default()
        })
    }

    /// Smooths with the default kernels of `sht-filter`.
    pub fn smooth(&self, kind: SmoothKind, radius: f64) -> Result<Self, ShtError> {
        self.smooth_with(kind, radius, &StandardFilter)
    }

    /// Multiplies every coefficient and error grid by the kernel's weighting grid.
    pub fn smooth_with(
        &self,
        kind: SmoothKind,
        radius: f64,
        kernel: &dyn FilterKernel,
    ) -> Result<Self, ShtError> {
        let weights = kernel.weights(kind, self.lmax, radius)?;
        let expected = (2, self.lmax + 1, self.lmax + 1);
        if weights.dim() != expected {
            let info = ErrorInfo::new(
                "weights-shape",
                format!(
                    "filter weights have shape {:?}, expected {:?}",
                    weights.shape(),
                    [expected.0, expected.1, expected.2]
                ),
            );
            return Err(ShtError::Shape(info));
        }
        let apply = |batch: &CoeffBatch| {
            let mut out = batch.clone();
            for mut grid in out.outer_iter_mut() {
                grid *= &weights;
            }
            out
        };
        tracing::debug!(kind = %kind, radius, lmax = self.lmax, "smoothing series");
        self.with_fields(SeriesOverrides {
            coeffs: Some(apply(&self.parts.coeffs)),
            errors: Some(self.parts.errors.as_ref().map(apply)),
            ..SeriesOverrides::default()
        })
    }

    /// Converts units with the default converter of `sht-units`.
    pub fn unitconvert(
        &self,
        unit: SpharmUnit,
        love: Option<&LoadLoveNumbers>,
    ) -> Result<Self, ShtError> {
        self.unitconvert_with(unit, love, &StandardConverter)
    }

    /// Converts coefficients (and the magnitude of errors) to `unit`.
    pub fn unitconvert_with(
        &self,
        unit: SpharmUnit,
        love: Option<&LoadLoveNumbers>,
        converter: &dyn UnitConverter,
    ) -> Result<Self, ShtError> {
        let coeffs = converter.convert(self.parts.coeffs.view(), self.parts.unit, unit, love)?;
        let errors = match &self.parts.errors {
            Some(errors) => Some(
                converter
                    .convert(errors.view(), self.parts.unit, unit, love)?
                    .mapv_into(f64::abs),
            ),
            None => None,
        };
        tracing::debug!(from = %self.parts.unit, to = %unit, "converting series unit");
        self.with_fields(SeriesOverrides {
            coeffs: Some(coeffs),
            unit: Some(unit),
            errors: Some(errors),
            ..SeriesOverrides::default()
        })
    }

    pub(crate) fn require_stokes(&self, operation: &str) -> Result<(), ShtError> {
        if self.parts.unit != SpharmUnit::Stokes {
            let info = ErrorInfo::new(
                "unit-not-stokes",
                format!(
                    "inconsistent attribute 'unit' <{}>, {operation} only accepts 'stokes'",
                    self.parts.unit
                ),
            )
            .with_context("unit", self.parts.unit.as_str())
            .with_hint("convert the series back to stokes first");
            return Err(ShtError::Unit(info));
        }
        Ok(())
    }
}
