use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sht_coeff::{SeriesOverrides, SpharmCoeff};
use sht_core::{CoefficientLoader, ErrorInfo, LoadedRecord, ShtError, SpharmUnit};

/// Options governing series assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOpts {
    /// Number of files loaded in parallel.
    pub concurrency: usize,
    /// Processing centre recorded as the first provenance entry (`GSM: <label>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for LoadOpts {
    fn default() -> Self {
        Self {
            concurrency: 1,
            label: None,
        }
    }
}

/// Loads every file through `loader` and assembles one stokes series sorted by epoch.
///
/// Files are read on a bounded pool; records are restored to input order
/// before assembly so the result does not depend on scheduling.
pub fn assemble<P>(
    paths: &[P],
    lmax: usize,
    loader: &dyn CoefficientLoader,
    opts: &LoadOpts,
) -> Result<SpharmCoeff, ShtError>
where
    P: AsRef<Path> + Sync,
{
    if paths.is_empty() {
        return Err(ShtError::Parameter(ErrorInfo::new(
            "no-input-files",
            "at least one coefficient file is required",
        )));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.concurrency.max(1))
        .build()
        .map_err(|err| ShtError::Source(ErrorInfo::new("thread_pool", err.to_string())))?;

    let results: Result<Vec<(usize, LoadedRecord)>, ShtError> = pool.install(|| {
        paths
            .par_iter()
            .enumerate()
            .map(|(index, path)| -> Result<(usize, LoadedRecord), ShtError> {
                let path = path.as_ref();
                let record = loader
                    .load(path, lmax)
                    .map_err(|err| err.with_context("path", path.display().to_string()))?;
                Ok((index, record))
            })
            .collect()
    });

    let mut ordered = results?;
    ordered.sort_by_key(|(index, _)| *index);
    let records = ordered.into_iter().map(|(_, record)| record).collect();

    let series = SpharmCoeff::from_records(records, SpharmUnit::Stokes)?;
    let series = match &opts.label {
        Some(label) => series.with_fields(SeriesOverrides {
            name: Some(Some(format!("GSM: {label}\n"))),
            ..SeriesOverrides::default()
        })?,
        None => series,
    };
    tracing::info!(files = paths.len(), lmax = series.lmax(), "assembled coefficient series");
    series.sort()
}
