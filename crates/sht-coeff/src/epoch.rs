//! Nearest-epoch search under tolerance.
//!
//! Every operation that pairs samples from two independently sampled series
//! (low-degree replacement, arithmetic combination) goes through
//! [`match_epoch`]. A query either finds a reference epoch within tolerance or
//! the whole operation fails; there is no nearest-but-too-far fallback.

use serde::{Deserialize, Serialize};
use sht_core::{ErrorInfo, ShtError};

/// Tolerance in decimal years for replacement and matched combination (~18 days).
pub const TIGHT_TOLERANCE: f64 = 0.05;

/// Tolerance in decimal years for treating two epoch sequences as aligned.
pub const LOOSE_TOLERANCE: f64 = 0.5;

/// Tolerances used when pairing epochs of two series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchTolerance {
    /// Maximum distance for a nearest-epoch match.
    #[serde(default = "MatchTolerance::default_tight")]
    pub tight: f64,
    /// Maximum elementwise distance for two sequences to count as aligned.
    #[serde(default = "MatchTolerance::default_loose")]
    pub loose: f64,
}

impl MatchTolerance {
    const fn default_tight() -> f64 {
        TIGHT_TOLERANCE
    }

    const fn default_loose() -> f64 {
        LOOSE_TOLERANCE
    }

    /// Checks that both tolerances are finite and non-negative.
    pub fn validated(self) -> Result<Self, ShtError> {
        validate_tolerance(self.tight)?;
        validate_tolerance(self.loose)?;
        Ok(self)
    }
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self {
            tight: TIGHT_TOLERANCE,
            loose: LOOSE_TOLERANCE,
        }
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<f64, ShtError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        let info = ErrorInfo::new(
            "invalid-tolerance",
            format!("invalid epoch tolerance <{tolerance}>, must be finite and non-negative"),
        );
        return Err(ShtError::Parameter(info));
    }
    Ok(tolerance)
}

/// Result of a nearest-epoch search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMatch {
    /// Position of the closest entry in the reference sequence.
    pub index: usize,
    /// Absolute distance in decimal years.
    pub delta: f64,
}

/// Finds the reference entry closest to `epoch`.
///
/// `NaN` entries in `reference` are skipped. Ties resolve to the first entry in
/// iteration order. Returns `None` when `epoch` is `NaN` or no entry is usable.
pub fn nearest_epoch(epoch: f64, reference: &[f64]) -> Option<EpochMatch> {
    if epoch.is_nan() {
        return None;
    }
    let mut best: Option<EpochMatch> = None;
    let mut skipped = 0usize;
    for (index, &candidate) in reference.iter().enumerate() {
        let delta = (candidate - epoch).abs();
        if delta.is_nan() {
            skipped += 1;
            continue;
        }
        match best {
            Some(current) if delta >= current.delta => {}
            _ => best = Some(EpochMatch { index, delta }),
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "ignored NaN entries in reference epochs");
    }
    best
}

/// Finds the closest reference entry and fails unless it lies within `tolerance`.
///
/// A distance exactly equal to `tolerance` is accepted. `source` names the
/// reference sequence in the error message.
pub fn match_epoch(
    epoch: f64,
    reference: &[f64],
    tolerance: f64,
    source: &str,
) -> Result<EpochMatch, ShtError> {
    match nearest_epoch(epoch, reference) {
        Some(found) if found.delta <= tolerance => Ok(found),
        found => {
            let mut info = ErrorInfo::new(
                "epoch-unmatched",
                format!("invalid value of epoch '{epoch:.4}', which cannot be found in {source} epochs"),
            )
            .with_context("epoch", format!("{epoch:.4}"))
            .with_context("tolerance", tolerance.to_string());
            if let Some(found) = found {
                info = info.with_context("nearest_delta", format!("{:.4}", found.delta));
            }
            Err(ShtError::EpochMatch(info))
        }
    }
}

/// Returns true when both sequences have the same length and agree elementwise
/// within `tolerance`.
pub fn epochs_aligned(left: &[f64], right: &[f64], tolerance: f64) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(a, b)| (a - b).abs() <= tolerance)
}
