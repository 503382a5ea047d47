use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, ShtError};

/// Implements `as_str`, `Display` and `FromStr` for closed string-tagged enums.
macro_rules! tagged_enum {
    ($ty:ident, $param:literal, { $($variant:ident => $tag:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Returns the canonical spelling of the variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ShtError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($tag => Ok($ty::$variant),)+
                    other => {
                        let expected = [$($tag),+].join(", ");
                        Err(ShtError::invalid_parameter($param, other, &expected))
                    }
                }
            }
        }
    };
}

/// Physical unit a coefficient series is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpharmUnit {
    /// Equivalent water height in millimetres.
    Mmewh,
    /// Equivalent water height in metres.
    Mewh,
    /// Equivalent water height in kilometres.
    Kmewh,
    /// Geoid height in millimetres.
    Mmgeo,
    /// Geoid height in metres.
    Mgeo,
    /// Geoid height in kilometres.
    Kmgeo,
    /// Vertical displacement in millimetres.
    Mmupl,
    /// Vertical displacement in metres.
    Mupl,
    /// Vertical displacement in kilometres.
    Kmupl,
    /// Surface mass density in kg/m².
    Kgm2mass,
    /// Dimensionless fully normalised Stokes coefficients.
    Stokes,
}

tagged_enum!(SpharmUnit, "unit", {
    Mmewh => "mmewh",
    Mewh => "mewh",
    Kmewh => "kmewh",
    Mmgeo => "mmgeo",
    Mgeo => "mgeo",
    Kmgeo => "kmgeo",
    Mmupl => "mmupl",
    Mupl => "mupl",
    Kmupl => "kmupl",
    Kgm2mass => "kgm2mass",
    Stokes => "stokes",
});

/// Physical quantity family of a [`SpharmUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Raw potential coefficients.
    Potential,
    /// Equivalent water height.
    WaterHeight,
    /// Geoid height.
    Geoid,
    /// Vertical displacement of the surface.
    Uplift,
    /// Surface mass density.
    Mass,
}

impl SpharmUnit {
    /// Returns the quantity family and the multiplier from the family's SI base.
    pub fn quantity(self) -> (Quantity, f64) {
        match self {
            SpharmUnit::Stokes => (Quantity::Potential, 1.0),
            SpharmUnit::Mmewh => (Quantity::WaterHeight, 1e3),
            SpharmUnit::Mewh => (Quantity::WaterHeight, 1.0),
            SpharmUnit::Kmewh => (Quantity::WaterHeight, 1e-3),
            SpharmUnit::Mmgeo => (Quantity::Geoid, 1e3),
            SpharmUnit::Mgeo => (Quantity::Geoid, 1.0),
            SpharmUnit::Kmgeo => (Quantity::Geoid, 1e-3),
            SpharmUnit::Mmupl => (Quantity::Uplift, 1e3),
            SpharmUnit::Mupl => (Quantity::Uplift, 1.0),
            SpharmUnit::Kmupl => (Quantity::Uplift, 1e-3),
            SpharmUnit::Kgm2mass => (Quantity::Mass, 1.0),
        }
    }
}

/// Named glacial isostatic adjustment models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GiaModel {
    /// ICE-6G_D (VM5a).
    #[serde(rename = "ICE6G-D")]
    Ice6gD,
    /// ICE-6G_C (VM5a).
    #[serde(rename = "ICE6G-C")]
    Ice6gC,
    /// Caron et al. (2018) ensemble.
    #[serde(rename = "C18")]
    C18,
}

tagged_enum!(GiaModel, "gia model", {
    Ice6gD => "ICE6G-D",
    Ice6gC => "ICE6G-C",
    C18 => "C18",
});

/// Supported smoothing kernel families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothKind {
    /// Isotropic Gaussian kernel.
    Gauss,
    /// Fan kernel (Gaussian in degree and order).
    Fan,
}

tagged_enum!(SmoothKind, "smooth kind", {
    Gauss => "gauss",
    Fan => "fan",
});

/// Direction in which a secular correction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionMode {
    /// Reintroduce the trend.
    Add,
    /// Remove the trend.
    #[default]
    Subtract,
}

tagged_enum!(CorrectionMode, "mode", {
    Add => "add",
    Subtract => "subtract",
});

impl CorrectionMode {
    /// Past-tense verb used in notices ("added", "subtracted").
    pub fn past_tense(self) -> &'static str {
        match self {
            CorrectionMode::Add => "added",
            CorrectionMode::Subtract => "subtracted",
        }
    }
}

/// Low-degree coefficient families that are routinely replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LowDegreeKind {
    /// Degree-2 zonal term.
    #[serde(rename = "C20")]
    C20,
    /// Degree-3 zonal term.
    #[serde(rename = "C30")]
    C30,
    /// Degree-1 terms (C10, C11, S11).
    #[serde(rename = "DEG1")]
    Deg1,
}

tagged_enum!(LowDegreeKind, "low-degree kind", {
    C20 => "C20",
    C30 => "C30",
    Deg1 => "DEG1",
});

/// Elastic load Love numbers indexed by degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadLoveNumbers {
    /// Radial displacement Love numbers `h_l`.
    pub h_el: Vec<f64>,
    /// Horizontal displacement Love numbers `l_l`.
    pub l_el: Vec<f64>,
    /// Gravitational potential Love numbers `k_l`.
    pub k_el: Vec<f64>,
}

impl LoadLoveNumbers {
    /// Creates a Love number set, requiring all three sequences to share a length.
    pub fn new(h_el: Vec<f64>, l_el: Vec<f64>, k_el: Vec<f64>) -> Result<Self, ShtError> {
        if h_el.len() != l_el.len() || h_el.len() != k_el.len() || k_el.is_empty() {
            let info = ErrorInfo::new(
                "love-number-length",
                "load Love number sequences must be non-empty and of equal length",
            )
            .with_context("h_el", h_el.len().to_string())
            .with_context("l_el", l_el.len().to_string())
            .with_context("k_el", k_el.len().to_string());
            return Err(ShtError::Parameter(info));
        }
        Ok(Self { h_el, l_el, k_el })
    }

    /// Number of degrees covered by the set (highest degree plus one).
    pub fn len(&self) -> usize {
        self.k_el.len()
    }

    /// Returns true when no degree is covered.
    pub fn is_empty(&self) -> bool {
        self.k_el.is_empty()
    }
}
