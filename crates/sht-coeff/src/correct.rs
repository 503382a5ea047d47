//! Secular corrections: GIA trend and pole tide.

use ndarray::Axis;
use sht_core::{
    append_entry, CorrectionMode, ErrorInfo, GiaModel, ShtError, TrendModelSource,
};

use crate::index::CoeffIndex;
use crate::series::{SeriesOverrides, SpharmCoeff};

/// Default reference epoch of the mean-pole polynomials.
pub const POLE_TIDE_REFERENCE_EPOCH: f64 = 2000.0;

/// Epochs up to and including this year use the cubic mean-pole model.
const MEAN_POLE_SWITCH_EPOCH: f64 = 2010.0;

const M1_BEFORE: [f64; 4] = [0.055974, 1.8243e-3, 1.8413e-4, 7.024e-6];
const M2_BEFORE: [f64; 4] = [-0.346346, -1.7896e-3, 1.0729e-4, 0.908e-6];
const M1_AFTER: [f64; 2] = [0.023513, 7.6141e-3];
const M2_AFTER: [f64; 2] = [-0.358891, 0.6287e-3];

const M1_GIA_RATE: f64 = 0.62e-3;
const M2_GIA_RATE: f64 = -3.48e-3;

const C21_INDEX: CoeffIndex = CoeffIndex::cos(2, 1);
const S21_INDEX: CoeffIndex = CoeffIndex::sin(2, 1);

fn polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Mean-pole offsets `(m1, m2)` in arcseconds, net of the linear GIA drift.
fn mean_pole_anomaly(epoch: f64, reference: f64) -> (f64, f64) {
    let dt = epoch - reference;
    let (m1, m2) = if epoch <= MEAN_POLE_SWITCH_EPOCH {
        (polynomial(&M1_BEFORE, dt), polynomial(&M2_BEFORE, dt))
    } else {
        (polynomial(&M1_AFTER, dt), polynomial(&M2_AFTER, dt))
    };
    (m1 - M1_GIA_RATE * dt, m2 - M2_GIA_RATE * dt)
}

impl SpharmCoeff {
    /// Removes or restores a GIA secular trend relative to the series' temporal mean.
    ///
    /// The per-year trend grid is projected onto every epoch as
    /// `(t - mean(t)) * trend`, so the correction never shifts the level of the
    /// series.
    ///
    /// The series must be in stokes; any other unit fails with a `Unit` error.
    pub fn corr_gia(
        &self,
        model: GiaModel,
        source: &dyn TrendModelSource,
        mode: CorrectionMode,
    ) -> Result<SpharmCoeff, ShtError> {
        self.require_stokes("corr_gia")?;
        let trend = source.trend(self.lmax(), model)?;
        let expected = [2, self.lmax() + 1, self.lmax() + 1];
        if trend.shape() != expected {
            let info = ErrorInfo::new(
                "trend-shape",
                format!(
                    "trend grid of {model} has shape {:?}, expected {expected:?}",
                    trend.shape()
                ),
            );
            return Err(ShtError::Shape(info));
        }

        let mean_epoch = self.epochs().iter().sum::<f64>() / self.len() as f64;
        let sign = match mode {
            CorrectionMode::Add => 1.0,
            CorrectionMode::Subtract => -1.0,
        };
        let mut coeffs = self.coeffs().clone();
        for (mut grid, &epoch) in coeffs.outer_iter_mut().zip(self.epochs()) {
            grid.scaled_add(sign * (epoch - mean_epoch), &trend);
        }

        let name = match mode {
            CorrectionMode::Subtract => append_entry(self.name(), "GIA", model.as_str()),
            CorrectionMode::Add => self.name().map(str::to_owned),
        };
        tracing::info!("GIA was {} by {}.", mode.past_tense(), model);

        self.with_fields(SeriesOverrides {
            coeffs: Some(coeffs),
            name: Some(name),
            ..SeriesOverrides::default()
        })
    }

    /// Removes the pole-tide signal from `C21` and `S21` with the IERS mean-pole model.
    pub fn pole_tide_correct(&self, reference: f64) -> Result<SpharmCoeff, ShtError> {
        self.require_stokes("pole_tide_correct")?;
        C21_INDEX.validate(self.lmax())?;
        if !reference.is_finite() {
            return Err(ShtError::invalid_parameter(
                "reference_time",
                &reference.to_string(),
                "a finite decimal year",
            ));
        }

        let [c_cs, c_l, c_m] = C21_INDEX.position();
        let [s_cs, s_l, s_m] = S21_INDEX.position();
        let mut coeffs = self.coeffs().clone();
        for (row, &epoch) in self.epochs().iter().enumerate() {
            let (m1, m2) = mean_pole_anomaly(epoch, reference);
            let mut grid = coeffs.index_axis_mut(Axis(0), row);
            grid[[c_cs, c_l, c_m]] -= -1.551e-9 * m1 - 0.012e-9 * m2;
            grid[[s_cs, s_l, s_m]] -= 0.021e-9 * m1 - 1.505e-9 * m2;
        }

        self.with_fields(SeriesOverrides {
            coeffs: Some(coeffs),
            name: Some(append_entry(self.name(), "Pole tide", &reference.to_string())),
            ..SeriesOverrides::default()
        })
    }
}
