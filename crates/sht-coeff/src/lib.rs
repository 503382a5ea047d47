#![deny(missing_docs)]
#![doc = "Time-indexed spherical-harmonic coefficient series: epoch matching, low-degree replacement, secular corrections and series arithmetic."]

/// Epoch-aligned addition and subtraction.
pub mod arith;
/// GIA and pole-tide corrections.
pub mod correct;
/// Nearest-epoch matching under tolerance.
pub mod epoch;
/// Spatial expansion hand-off.
pub mod expand;
/// Canonical content hashing.
pub mod hash;
/// Coefficient cell positions and low-degree index sets.
pub mod index;
/// Replacement tables and the `replace` dispatch.
pub mod replace;
/// JSON and binary persistence.
pub mod serde;
/// The series container.
pub mod series;

pub use arith::ArithOp;
pub use correct::POLE_TIDE_REFERENCE_EPOCH;
pub use epoch::{
    epochs_aligned, match_epoch, nearest_epoch, EpochMatch, MatchTolerance, LOOSE_TOLERANCE,
    TIGHT_TOLERANCE,
};
pub use expand::SphereGrid;
pub use hash::canonical_series_hash;
pub use index::{low_degree_indices, CoeffIndex, Cs, C20_INDEX, C30_INDEX, DEG1_INDICES};
pub use replace::{LowDegreeCorrection, ReplaceCoeff, ReplaceLabel, C30_CUTOVER_EPOCH};
pub use self::serde::{from_bytes, from_json, read_json, to_bytes, to_json, write_json};
pub use series::{SeriesOverrides, SeriesParts, SpharmCoeff};
