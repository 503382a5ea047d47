//! Structured error types shared across SHT crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`ShtError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (epochs, shapes, offending values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for coefficient series operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ShtError {
    /// Array rank, shape or batch-length contract violations.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Operation is not defined for the unit the series is expressed in.
    #[error("unit error: {0}")]
    Unit(ErrorInfo),
    /// No reference epoch was found within tolerance.
    #[error("epoch error: {0}")]
    EpochMatch(ErrorInfo),
    /// Unrecognised or out-of-range parameter value.
    #[error("parameter error: {0}")]
    Parameter(ErrorInfo),
    /// Malformed provenance label on a replacement table.
    #[error("label error: {0}")]
    Label(ErrorInfo),
    /// Failure reported by an external collaborator (loader, model reader).
    #[error("source error: {0}")]
    Source(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl ShtError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ShtError::Shape(info)
            | ShtError::Unit(info)
            | ShtError::EpochMatch(info)
            | ShtError::Parameter(info)
            | ShtError::Label(info)
            | ShtError::Source(info)
            | ShtError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            ShtError::Shape(info) => ShtError::Shape(info.with_context(key, value)),
            ShtError::Unit(info) => ShtError::Unit(info.with_context(key, value)),
            ShtError::EpochMatch(info) => ShtError::EpochMatch(info.with_context(key, value)),
            ShtError::Parameter(info) => ShtError::Parameter(info.with_context(key, value)),
            ShtError::Label(info) => ShtError::Label(info.with_context(key, value)),
            ShtError::Source(info) => ShtError::Source(info.with_context(key, value)),
            ShtError::Serde(info) => ShtError::Serde(info.with_context(key, value)),
        }
    }

    /// Shorthand for an invalid enumerated parameter naming the rejected value.
    pub fn invalid_parameter(name: &str, value: &str, expected: &str) -> Self {
        ShtError::Parameter(
            ErrorInfo::new(
                "invalid-parameter",
                format!("invalid value of {name} <{value}>, must be one of {expected}"),
            )
            .with_context("parameter", name)
            .with_context("value", value),
        )
    }
}
