use std::fmt;

use serde::{Deserialize, Serialize};
use sht_core::{ErrorInfo, LowDegreeKind, ShtError};

/// Cosine or sine half of a coefficient grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cs {
    /// `C_lm` coefficients, stored at position 0.
    Cos,
    /// `S_lm` coefficients, stored at position 1.
    Sin,
}

impl Cs {
    /// Position along the first grid axis.
    pub const fn position(self) -> usize {
        match self {
            Cs::Cos => 0,
            Cs::Sin => 1,
        }
    }
}

/// Position `(cs, degree, order)` of a single coefficient cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoeffIndex {
    /// Cosine or sine half.
    pub cs: Cs,
    /// Spherical-harmonic degree `l`.
    pub degree: usize,
    /// Spherical-harmonic order `m`.
    pub order: usize,
}

impl CoeffIndex {
    /// Index of the cosine coefficient `C_lm`.
    pub const fn cos(degree: usize, order: usize) -> Self {
        Self {
            cs: Cs::Cos,
            degree,
            order,
        }
    }

    /// Index of the sine coefficient `S_lm`.
    pub const fn sin(degree: usize, order: usize) -> Self {
        Self {
            cs: Cs::Sin,
            degree,
            order,
        }
    }

    /// Array position `[cs, degree, order]` within a single grid.
    pub const fn position(&self) -> [usize; 3] {
        [self.cs.position(), self.degree, self.order]
    }

    /// Checks the cell is physically meaningful for a grid of maximum degree `lmax`.
    pub fn validate(&self, lmax: usize) -> Result<(), ShtError> {
        if self.order > self.degree || self.degree > lmax {
            let info = ErrorInfo::new(
                "index-out-of-range",
                format!("coefficient index {self} is outside the triangle of lmax {lmax}"),
            )
            .with_context("lmax", lmax.to_string());
            return Err(ShtError::Shape(info));
        }
        Ok(())
    }
}

impl fmt::Display for CoeffIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.cs.position(), self.degree, self.order)
    }
}

/// Degree-2 zonal term `C20`.
pub const C20_INDEX: CoeffIndex = CoeffIndex::cos(2, 0);

/// Degree-3 zonal term `C30`.
pub const C30_INDEX: CoeffIndex = CoeffIndex::cos(3, 0);

/// Degree-1 terms `C10`, `C11`, `S11`, in the column order of degree-1 products.
pub const DEG1_INDICES: [CoeffIndex; 3] = [
    CoeffIndex::cos(1, 0),
    CoeffIndex::cos(1, 1),
    CoeffIndex::sin(1, 1),
];

/// Cells substituted by each low-degree replacement family.
pub fn low_degree_indices(kind: LowDegreeKind) -> &'static [CoeffIndex] {
    match kind {
        LowDegreeKind::C20 => &[C20_INDEX],
        LowDegreeKind::C30 => &[C30_INDEX],
        LowDegreeKind::Deg1 => &DEG1_INDICES,
    }
}
