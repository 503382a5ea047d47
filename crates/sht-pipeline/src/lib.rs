#![deny(missing_docs)]
#![doc = "Pipeline configuration, deterministic parallel assembly and the correction pipeline for coefficient series."]

/// YAML/JSON pipeline configuration.
pub mod config;
/// Parallel loading and assembly of per-file coefficients.
pub mod load;
/// Fixed-order correction pipeline.
pub mod pipeline;

pub use config::{GiaStep, PipelineConfig, SmoothStep};
pub use load::{assemble, LoadOpts};
pub use pipeline::{run, Collaborators};
