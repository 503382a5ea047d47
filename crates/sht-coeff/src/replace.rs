//! Low-degree replacement tables and the series-level `replace` dispatch.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sht_core::{
    append_entry, ErrorInfo, LowDegreeKind, LowDegreeRecord, LowDegreeSource, ShtError,
    SpharmUnit,
};

use crate::epoch::{match_epoch, validate_tolerance, TIGHT_TOLERANCE};
use crate::index::{low_degree_indices, CoeffIndex, C30_INDEX};
use crate::series::{SeriesOverrides, SpharmCoeff};

/// Epochs before this year keep their original `C30` value.
pub const C30_CUTOVER_EPOCH: f64 = 2018.0;

/// Two-part provenance label `(short code, source centre)`, e.g. `("C20", "CSR")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceLabel {
    /// Short code of the replaced term.
    pub code: String,
    /// Centre that produced the substitute values.
    pub center: String,
}

impl ReplaceLabel {
    /// Creates a label from its two parts.
    pub fn new(code: impl Into<String>, center: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            center: center.into(),
        }
    }

    /// Builds a label from a loosely typed sequence, which must have exactly two parts.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, ShtError> {
        match parts {
            [code, center] => Ok(Self::new(code.as_ref(), center.as_ref())),
            _ => {
                let rendered: Vec<&str> = parts.iter().map(|part| part.as_ref()).collect();
                let info = ErrorInfo::new(
                    "label-shape",
                    format!("invalid attribute of name <{rendered:?}>"),
                )
                .with_context("parts", parts.len().to_string())
                .with_hint("a replacement label is either absent or (code, center)");
                Err(ShtError::Label(info))
            }
        }
    }
}

/// Substitute values for a fixed set of coefficient cells, sampled on their own epochs.
///
/// `coeffs` holds one row per substitute epoch and one column per index.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceCoeff {
    indices: Vec<CoeffIndex>,
    coeffs: Array2<f64>,
    epochs: Vec<f64>,
    unit: SpharmUnit,
    errors: Option<Array2<f64>>,
    label: Option<ReplaceLabel>,
    tolerance: f64,
    c30_cutover: f64,
}

impl ReplaceCoeff {
    /// Creates a table substituting `indices` with the columns of `coeffs`.
    pub fn new(
        indices: Vec<CoeffIndex>,
        coeffs: Array2<f64>,
        epochs: Vec<f64>,
        unit: SpharmUnit,
    ) -> Result<Self, ShtError> {
        if indices.is_empty() {
            return Err(ShtError::Shape(ErrorInfo::new(
                "empty-indices",
                "a replacement table needs at least one coefficient index",
            )));
        }
        let expected = (epochs.len(), indices.len());
        if coeffs.dim() != expected {
            let info = ErrorInfo::new(
                "replacement-shape",
                format!(
                    "replacement values have shape {:?}, expected [{}, {}]",
                    coeffs.shape(),
                    expected.0,
                    expected.1
                ),
            );
            return Err(ShtError::Shape(info));
        }
        Ok(Self {
            indices,
            coeffs,
            epochs,
            unit,
            errors: None,
            label: None,
            tolerance: TIGHT_TOLERANCE,
            c30_cutover: C30_CUTOVER_EPOCH,
        })
    }

    /// Creates a table substituting a single cell.
    pub fn single(
        index: CoeffIndex,
        values: Vec<f64>,
        epochs: Vec<f64>,
        unit: SpharmUnit,
    ) -> Result<Self, ShtError> {
        let rows = values.len();
        let coeffs = Array2::from_shape_vec((rows, 1), values)
            .map_err(|err| ShtError::Shape(ErrorInfo::new("replacement-shape", err.to_string())))?;
        Self::new(vec![index], coeffs, epochs, unit)
    }

    /// Builds the table for a low-degree family from a tracking-product record.
    pub fn from_low_degree(kind: LowDegreeKind, record: LowDegreeRecord) -> Result<Self, ShtError> {
        let LowDegreeRecord {
            epochs,
            values,
            errors,
            center,
        } = record;
        let table = Self::new(
            low_degree_indices(kind).to_vec(),
            values,
            epochs,
            SpharmUnit::Stokes,
        )?
        .with_label(ReplaceLabel::new(kind.as_str(), center));
        match errors {
            Some(errors) => table.with_errors(errors),
            None => Ok(table),
        }
    }

    /// Attaches uncertainties with the same shape as the values.
    pub fn with_errors(mut self, errors: Array2<f64>) -> Result<Self, ShtError> {
        if errors.dim() != self.coeffs.dim() {
            let info = ErrorInfo::new(
                "replacement-errors-shape",
                format!(
                    "replacement errors have shape {:?}, values have {:?}",
                    errors.shape(),
                    self.coeffs.shape()
                ),
            );
            return Err(ShtError::Shape(info));
        }
        self.errors = Some(errors);
        Ok(self)
    }

    /// Sets the provenance label.
    pub fn with_label(mut self, label: ReplaceLabel) -> Self {
        self.label = Some(label);
        self
    }

    /// Sets the label from an optional loosely typed sequence.
    pub fn with_label_parts<S: AsRef<str>>(mut self, parts: Option<&[S]>) -> Result<Self, ShtError> {
        self.label = parts.map(ReplaceLabel::from_parts).transpose()?;
        Ok(self)
    }

    /// Overrides the matching tolerance in decimal years.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, ShtError> {
        self.tolerance = validate_tolerance(tolerance)?;
        Ok(self)
    }

    /// Overrides the `C30` cutover epoch.
    pub fn with_c30_cutover(mut self, epoch: f64) -> Self {
        self.c30_cutover = epoch;
        self
    }

    /// Replaced cells.
    pub fn indices(&self) -> &[CoeffIndex] {
        &self.indices
    }

    /// Substitute values `[epoch, index]`.
    pub fn coeffs(&self) -> &Array2<f64> {
        &self.coeffs
    }

    /// Substitute epochs.
    pub fn epochs(&self) -> &[f64] {
        &self.epochs
    }

    /// Unit of the substitute values.
    pub fn unit(&self) -> SpharmUnit {
        self.unit
    }

    /// Substitute uncertainties.
    pub fn errors(&self) -> Option<&Array2<f64>> {
        self.errors.as_ref()
    }

    /// Provenance label.
    pub fn label(&self) -> Option<&ReplaceLabel> {
        self.label.as_ref()
    }

    /// Matching tolerance in decimal years.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Cutover epoch for `C30` tables.
    pub fn c30_cutover(&self) -> f64 {
        self.c30_cutover
    }

    /// True when the table substitutes exactly the `C30` cell.
    pub fn targets_c30(&self) -> bool {
        self.indices == [C30_INDEX]
    }

    /// Splices the substitute values into `series` at matched epochs.
    ///
    /// Every target epoch must match a substitute epoch within tolerance,
    /// except epochs before the cutover of a `C30` table, which are left as is.
    /// Error cells are overwritten only when both sides carry errors.
    pub fn apply_to(&self, series: &SpharmCoeff) -> Result<SpharmCoeff, ShtError> {
        if self.unit != series.unit() {
            let info = ErrorInfo::new(
                "replacement-unit",
                format!(
                    "the unit of the replacement <{}> is unequal to that of the series <{}>",
                    self.unit,
                    series.unit()
                ),
            );
            return Err(ShtError::Unit(info));
        }
        for index in &self.indices {
            index.validate(series.lmax())?;
        }

        let source = self
            .label
            .as_ref()
            .map_or("replacement", |label| label.center.as_str());
        let mut coeffs = series.coeffs().clone();
        let mut errors = series.errors().cloned();
        let skip_before = self.targets_c30().then_some(self.c30_cutover);

        for (row, &epoch) in series.epochs().iter().enumerate() {
            if skip_before.is_some_and(|cutover| epoch < cutover) {
                continue;
            }
            let found = match_epoch(epoch, &self.epochs, self.tolerance, source)?;
            for (col, index) in self.indices.iter().enumerate() {
                let [cs, degree, order] = index.position();
                coeffs[[row, cs, degree, order]] = self.coeffs[[found.index, col]];
                if let (Some(target), Some(substitute)) = (errors.as_mut(), self.errors.as_ref()) {
                    target[[row, cs, degree, order]] = substitute[[found.index, col]];
                }
            }
        }

        let name = match &self.label {
            Some(label) => {
                tracing::info!("{} was replaced by {}.", label.code, label.center);
                append_entry(series.name(), &label.code, &label.center)
            }
            None => {
                let cells: Vec<String> = self.indices.iter().map(ToString::to_string).collect();
                tracing::info!("The coeff at index {} was replaced.", cells.join(", "));
                series.name().map(str::to_owned)
            }
        };

        series.with_fields(SeriesOverrides {
            coeffs: Some(coeffs),
            errors: Some(errors),
            name: Some(name),
            ..SeriesOverrides::default()
        })
    }
}

/// A named low-degree replacement resolved through a source collaborator.
#[derive(Clone, Copy)]
pub struct LowDegreeCorrection<'a> {
    /// Replaced family.
    pub kind: LowDegreeKind,
    /// Reader for the substitute series.
    pub source: &'a dyn LowDegreeSource,
    /// Matching tolerance in decimal years.
    pub tolerance: f64,
}

impl<'a> LowDegreeCorrection<'a> {
    /// Creates a correction with the tight matching tolerance.
    pub fn new(kind: LowDegreeKind, source: &'a dyn LowDegreeSource) -> Self {
        Self {
            kind,
            source,
            tolerance: TIGHT_TOLERANCE,
        }
    }

    /// Overrides the matching tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn table(&self) -> Result<ReplaceCoeff, ShtError> {
        let record = self.source.read(self.kind)?;
        ReplaceCoeff::from_low_degree(self.kind, record)?.with_tolerance(self.tolerance)
    }
}

impl std::fmt::Debug for LowDegreeCorrection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LowDegreeCorrection")
            .field("kind", &self.kind)
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl SpharmCoeff {
    /// Replaces low-degree coefficients.
    ///
    /// An explicit `table` is applied directly. Otherwise each correction is
    /// resolved through its source and applied in the given order.
    pub fn replace(
        &self,
        corrections: &[LowDegreeCorrection<'_>],
        table: Option<&ReplaceCoeff>,
    ) -> Result<SpharmCoeff, ShtError> {
        self.require_stokes("replace")?;
        if let Some(table) = table {
            return table.apply_to(self);
        }
        if corrections.is_empty() {
            let info = ErrorInfo::new(
                "replace-nothing",
                "either low-degree corrections or an explicit table must be given",
            );
            return Err(ShtError::Parameter(info));
        }
        corrections
            .iter()
            .try_fold(self.clone(), |series, correction| {
                correction.table()?.apply_to(&series)
            })
    }
}
