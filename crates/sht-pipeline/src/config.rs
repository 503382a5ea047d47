use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sht_coeff::MatchTolerance;
use sht_core::{
    CorrectionMode, ErrorInfo, GiaModel, LoadLoveNumbers, LowDegreeKind, ShtError, SmoothKind,
    SpharmUnit,
};

fn serde_error(code: &str, err: impl ToString) -> ShtError {
    ShtError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn default_radius() -> f64 {
    300.0
}

/// GIA correction step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GiaStep {
    /// Trend model to apply.
    pub model: GiaModel,
    /// Direction of the correction.
    #[serde(default)]
    pub mode: CorrectionMode,
}

/// Spectral smoothing step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothStep {
    /// Kernel family.
    pub kind: SmoothKind,
    /// Kernel radius in kilometres.
    #[serde(default = "default_radius")]
    pub radius: f64,
}

/// Steps of the correction pipeline. Omitted steps are skipped.
///
/// ```yaml
/// lmax: 60
/// replace: [C20, C30, DEG1]
/// gia: { model: ICE6G-D, mode: subtract }
/// remove_mean: true
/// smooth: { kind: gauss, radius: 300 }
/// unit: mmewh
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum degree of the input series. `run` rejects a series of another
    /// degree, and Love numbers must cover every degree up to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lmax: Option<usize>,
    /// Low-degree families to replace, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<LowDegreeKind>,
    /// GIA trend correction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gia: Option<GiaStep>,
    /// Subtract the temporal mean field.
    #[serde(default)]
    pub remove_mean: bool,
    /// Spectral smoothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth: Option<SmoothStep>,
    /// Target unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<SpharmUnit>,
    /// Load Love numbers for the unit conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub love: Option<LoadLoveNumbers>,
    /// Epoch matching tolerances.
    #[serde(default)]
    pub tolerance: MatchTolerance,
}

impl PipelineConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(data: &str) -> Result<Self, ShtError> {
        let config: Self =
            serde_yaml::from_str(data).map_err(|err| serde_error("yaml_deserialize", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document.
    pub fn from_json_str(data: &str) -> Result<Self, ShtError> {
        let config: Self =
            serde_json::from_str(data).map_err(|err| serde_error("json_deserialize", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShtError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            serde_error("config_read", err).with_context("path", path.display().to_string())
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        };
        parsed.map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, ShtError> {
        serde_yaml::to_string(self).map_err(|err| serde_error("yaml_serialize", err))
    }

    /// Checks tolerances, smoothing radius and Love number coverage.
    pub fn validate(&self) -> Result<(), ShtError> {
        self.tolerance.validated()?;
        if let Some(step) = &self.smooth {
            if !step.radius.is_finite() || step.radius < 0.0 {
                return Err(ShtError::invalid_parameter(
                    "smooth.radius",
                    &step.radius.to_string(),
                    "a non-negative number of kilometres",
                ));
            }
        }
        if let Some(love) = &self.love {
            LoadLoveNumbers::new(love.h_el.clone(), love.l_el.clone(), love.k_el.clone())?;
        }
        if let (Some(lmax), Some(love)) = (self.lmax, &self.love) {
            if love.len() <= lmax {
                let info = ErrorInfo::new(
                    "love-number-degree",
                    format!("load Love numbers cover {} degrees, {} required", love.len(), lmax + 1),
                );
                return Err(ShtError::Parameter(info));
            }
        }
        Ok(())
    }
}
