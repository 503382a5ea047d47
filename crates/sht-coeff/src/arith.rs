//! Epoch-aligned addition and subtraction of two series.

use std::fmt;
use std::ops::{Add, Sub};

use ndarray::Axis;
use sht_core::{ErrorInfo, ShtError};

use crate::epoch::{epochs_aligned, match_epoch, MatchTolerance};
use crate::series::{SeriesOverrides, SpharmCoeff};

/// Binary operator of [`SpharmCoeff::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    /// Elementwise sum.
    Add,
    /// Elementwise difference `left - right`.
    Subtract,
}

impl ArithOp {
    fn sign(self) -> f64 {
        match self {
            ArithOp::Add => 1.0,
            ArithOp::Subtract => -1.0,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithOp::Add => "add",
            ArithOp::Subtract => "subtract",
        })
    }
}

impl SpharmCoeff {
    /// Combines two series with the default tolerances.
    pub fn combine(&self, other: &SpharmCoeff, op: ArithOp) -> Result<SpharmCoeff, ShtError> {
        self.combine_with(other, op, MatchTolerance::default())
    }

    /// Combines two series.
    ///
    /// Batches of equal shape whose epochs agree elementwise within
    /// `tolerance.loose` are combined directly. Otherwise, when the per-epoch
    /// grids agree, every left epoch is paired with its nearest right epoch
    /// within `tolerance.tight` and the whole call fails if any is unmatched.
    /// Epochs, unit, errors and provenance of the result follow `self`.
    pub fn combine_with(
        &self,
        other: &SpharmCoeff,
        op: ArithOp,
        tolerance: MatchTolerance,
    ) -> Result<SpharmCoeff, ShtError> {
        let tolerance = tolerance.validated()?;
        if self.unit() != other.unit() {
            let info = ErrorInfo::new(
                "combine-unit",
                format!(
                    "cannot {op} a series in <{}> and a series in <{}>",
                    self.unit(),
                    other.unit()
                ),
            );
            return Err(ShtError::Unit(info));
        }

        let left = self.coeffs();
        let right = other.coeffs();
        let sign = op.sign();
        let mut coeffs = left.clone();

        if left.shape() == right.shape()
            && epochs_aligned(self.epochs(), other.epochs(), tolerance.loose)
        {
            coeffs.scaled_add(sign, right);
        } else if left.shape()[1..] == right.shape()[1..] {
            for (row, &epoch) in self.epochs().iter().enumerate() {
                let found = match_epoch(epoch, other.epochs(), tolerance.tight, "right operand")?;
                coeffs
                    .index_axis_mut(Axis(0), row)
                    .scaled_add(sign, &right.index_axis(Axis(0), found.index));
            }
        } else {
            let info = ErrorInfo::new(
                "combine-shape",
                format!(
                    "cannot {op} series of shapes {:?} and {:?}",
                    left.shape(),
                    right.shape()
                ),
            );
            return Err(ShtError::Shape(info));
        }

        self.with_fields(SeriesOverrides {
            coeffs: Some(coeffs),
            ..SeriesOverrides::default()
        })
    }

    /// `self + other` with the default tolerances.
    pub fn checked_add(&self, other: &SpharmCoeff) -> Result<SpharmCoeff, ShtError> {
        self.combine(other, ArithOp::Add)
    }

    /// `self - other` with the default tolerances.
    pub fn checked_sub(&self, other: &SpharmCoeff) -> Result<SpharmCoeff, ShtError> {
        self.combine(other, ArithOp::Subtract)
    }
}

impl Add for &SpharmCoeff {
    type Output = Result<SpharmCoeff, ShtError>;

    fn add(self, rhs: &SpharmCoeff) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl Sub for &SpharmCoeff {
    type Output = Result<SpharmCoeff, ShtError>;

    fn sub(self, rhs: &SpharmCoeff) -> Self::Output {
        self.checked_sub(rhs)
    }
}
