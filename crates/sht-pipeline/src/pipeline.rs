use sht_coeff::{LowDegreeCorrection, SpharmCoeff};
use sht_core::{
    ErrorInfo, FilterKernel, LowDegreeSource, ShtError, TrendModelSource, UnitConverter,
};
use sht_filter::StandardFilter;
use sht_units::StandardConverter;

use crate::config::PipelineConfig;

/// External collaborators consulted by [`run`].
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Substitute low-degree series, required when replacements are configured.
    pub low_degree: Option<&'a dyn LowDegreeSource>,
    /// GIA trend grids, required when a GIA step is configured.
    pub trend: Option<&'a dyn TrendModelSource>,
    /// Smoothing kernel.
    pub filter: &'a dyn FilterKernel,
    /// Unit converter.
    pub converter: &'a dyn UnitConverter,
}

impl<'a> Collaborators<'a> {
    /// Uses the given low-degree source.
    pub fn with_low_degree(mut self, source: &'a dyn LowDegreeSource) -> Self {
        self.low_degree = Some(source);
        self
    }

    /// Uses the given trend source.
    pub fn with_trend(mut self, source: &'a dyn TrendModelSource) -> Self {
        self.trend = Some(source);
        self
    }

    /// Replaces the smoothing kernel.
    pub fn with_filter(mut self, filter: &'a dyn FilterKernel) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the unit converter.
    pub fn with_converter(mut self, converter: &'a dyn UnitConverter) -> Self {
        self.converter = converter;
        self
    }
}

impl Default for Collaborators<'_> {
    fn default() -> Self {
        Self {
            low_degree: None,
            trend: None,
            filter: &StandardFilter,
            converter: &StandardConverter,
        }
    }
}

fn missing(collaborator: &str, step: &str) -> ShtError {
    ShtError::Parameter(
        ErrorInfo::new(
            "collaborator-missing",
            format!("the {step} step requires a {collaborator}"),
        )
        .with_context("step", step),
    )
}

/// Applies the configured steps in the order replace, GIA, mean removal,
/// smoothing, unit conversion.
pub fn run(
    series: &SpharmCoeff,
    config: &PipelineConfig,
    collaborators: &Collaborators<'_>,
) -> Result<SpharmCoeff, ShtError> {
    config.validate()?;
    if let Some(lmax) = config.lmax {
        if lmax != series.lmax() {
            let info = ErrorInfo::new(
                "lmax-mismatch",
                format!("configured for degree {lmax}, series has degree {}", series.lmax()),
            )
            .with_context("configured", lmax.to_string())
            .with_context("series", series.lmax().to_string());
            return Err(ShtError::Shape(info));
        }
    }
    let mut current = series.clone();

    if !config.replace.is_empty() {
        let source = collaborators
            .low_degree
            .ok_or_else(|| missing("low-degree source", "replace"))?;
        let corrections: Vec<_> = config
            .replace
            .iter()
            .map(|&kind| LowDegreeCorrection::new(kind, source).with_tolerance(config.tolerance.tight))
            .collect();
        tracing::debug!(kinds = ?config.replace, "pipeline step: replace");
        current = current.replace(&corrections, None)?;
    }

    if let Some(step) = &config.gia {
        let source = collaborators
            .trend
            .ok_or_else(|| missing("trend model source", "gia"))?;
        tracing::debug!(model = %step.model, mode = %step.mode, "pipeline step: gia");
        current = current.corr_gia(step.model, source, step.mode)?;
    }

    if config.remove_mean {
        tracing::debug!("pipeline step: remove mean field");
        current = current.remove_mean_field()?;
    }

    if let Some(step) = &config.smooth {
        tracing::debug!(kind = %step.kind, radius = step.radius, "pipeline step: smooth");
        current = current.smooth_with(step.kind, step.radius, collaborators.filter)?;
    }

    if let Some(unit) = config.unit {
        tracing::debug!(unit = %unit, "pipeline step: unit conversion");
        current = current.unitconvert_with(unit, config.love.as_ref(), collaborators.converter)?;
    }

    Ok(current)
}
