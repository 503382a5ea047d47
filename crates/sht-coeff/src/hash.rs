use sha2::{Digest, Sha256};

use crate::series::SpharmCoeff;

fn update_str(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(text) => {
            hasher.update([1u8]);
            hasher.update((text.len() as u64).to_le_bytes());
            hasher.update(text.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}

/// Computes the canonical content hash of a series.
///
/// Covers shape, unit, epochs, coefficient and error bit patterns, error kind
/// and provenance. Values are hashed in logical (row-major) order regardless
/// of memory layout.
pub fn canonical_series_hash(series: &SpharmCoeff) -> String {
    let mut hasher = Sha256::new();
    for &dim in series.coeffs().shape() {
        hasher.update((dim as u64).to_le_bytes());
    }
    update_str(&mut hasher, Some(series.unit().as_str()));
    for &epoch in series.epochs() {
        hasher.update(epoch.to_bits().to_le_bytes());
    }
    for &value in series.coeffs() {
        hasher.update(value.to_bits().to_le_bytes());
    }
    match series.errors() {
        Some(errors) => {
            hasher.update([1u8]);
            for &value in errors {
                hasher.update(value.to_bits().to_le_bytes());
            }
        }
        None => hasher.update([0u8]),
    }
    update_str(&mut hasher, series.error_kind());
    update_str(&mut hasher, series.name());

    let digest = hasher.finalize();
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
}
