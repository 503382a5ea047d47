use std::fs;
use std::path::Path;

use ndarray::Array4;
use serde::{Deserialize, Serialize};
use sht_core::{ErrorInfo, SchemaVersion, ShtError, SpharmUnit};

use crate::hash::canonical_series_hash;
use crate::series::{SeriesParts, SpharmCoeff};

/// Schema of the payload written by this crate.
pub const SERIES_SCHEMA: SchemaVersion = SchemaVersion::new(2, 0, 0);

#[derive(Debug, Serialize, Deserialize)]
struct SerializableSeries {
    schema_version: SchemaVersion,
    content_hash: String,
    unit: SpharmUnit,
    shape: [usize; 4],
    // IEEE-754 bit patterns; JSON numbers cannot carry NaN or infinities.
    epochs: Vec<u64>,
    coeffs: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

fn serde_error(code: &str, message: impl Into<String>) -> ShtError {
    ShtError::Serde(ErrorInfo::new(code, message))
}

fn to_bits<'a>(values: impl IntoIterator<Item = &'a f64>) -> Vec<u64> {
    values.into_iter().map(|value| value.to_bits()).collect()
}

fn from_bits(bits: Vec<u64>) -> Vec<f64> {
    bits.into_iter().map(f64::from_bits).collect()
}

fn to_batch(shape: [usize; 4], bits: Vec<u64>) -> Result<Array4<f64>, ShtError> {
    let [n, cs, l, m] = shape;
    Array4::from_shape_vec((n, cs, l, m), from_bits(bits))
        .map_err(|err| serde_error("payload-shape", err.to_string()))
}

/// Serializes a series to a pretty JSON string.
pub fn to_json(series: &SpharmCoeff) -> Result<String, ShtError> {
    let (n, cs, l, m) = series.coeffs().dim();
    let payload = SerializableSeries {
        schema_version: SERIES_SCHEMA,
        content_hash: canonical_series_hash(series),
        unit: series.unit(),
        shape: [n, cs, l, m],
        epochs: to_bits(series.epochs()),
        coeffs: to_bits(series.coeffs()),
        errors: series.errors().map(|errors| to_bits(errors)),
        error_kind: series.error_kind().map(str::to_owned),
        name: series.name().map(str::to_owned),
    };
    serde_json::to_string_pretty(&payload)
        .map_err(|err| serde_error("json-serialize", err.to_string()))
}

/// Restores a series from a JSON string, re-validating shape and content hash.
pub fn from_json(data: &str) -> Result<SpharmCoeff, ShtError> {
    let payload: SerializableSeries = serde_json::from_str(data)
        .map_err(|err| serde_error("json-deserialize", err.to_string()))?;
    if payload.schema_version.major != SERIES_SCHEMA.major {
        let info = ErrorInfo::new(
            "schema-version",
            format!(
                "unsupported schema {}.{}.{}",
                payload.schema_version.major,
                payload.schema_version.minor,
                payload.schema_version.patch
            ),
        )
        .with_context("supported_major", SERIES_SCHEMA.major.to_string());
        return Err(ShtError::Serde(info));
    }

    let mut parts = SeriesParts::new(
        to_batch(payload.shape, payload.coeffs)?,
        from_bits(payload.epochs),
        payload.unit,
    );
    parts.errors = payload
        .errors
        .map(|errors| to_batch(payload.shape, errors))
        .transpose()?;
    parts.error_kind = payload.error_kind;
    parts.name = payload.name;
    let series = SpharmCoeff::from_parts(parts)?;

    let actual = canonical_series_hash(&series);
    if actual != payload.content_hash {
        let info = ErrorInfo::new("content-hash", "payload content does not match its hash")
            .with_context("expected", payload.content_hash)
            .with_context("actual", actual);
        return Err(ShtError::Serde(info));
    }
    Ok(series)
}

/// Serializes a series into a binary blob.
pub fn to_bytes(series: &SpharmCoeff) -> Result<Vec<u8>, ShtError> {
    let json = to_json(series)?;
    bincode::serialize(&json).map_err(|err| serde_error("bincode-serialize", err.to_string()))
}

/// Rehydrates a series from a binary blob.
pub fn from_bytes(bytes: &[u8]) -> Result<SpharmCoeff, ShtError> {
    let json: String = bincode::deserialize(bytes)
        .map_err(|err| serde_error("bincode-deserialize", err.to_string()))?;
    from_json(&json)
}

/// Writes the JSON payload of `series` to `path`.
pub fn write_json(series: &SpharmCoeff, path: &Path) -> Result<(), ShtError> {
    let json = to_json(series)?;
    fs::write(path, json).map_err(|err| {
        ShtError::Serde(
            ErrorInfo::new("io-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

/// Reads a series previously written with [`write_json`].
pub fn read_json(path: &Path) -> Result<SpharmCoeff, ShtError> {
    let json = fs::read_to_string(path).map_err(|err| {
        ShtError::Serde(
            ErrorInfo::new("io-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    from_json(&json)
}
