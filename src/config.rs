// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `EnergySystem` and
//! the `ComparisonSession`.

use std::collections::{BTreeMap, HashSet};

use crate::Error;

/// Configuration options for the `EnergySystem`.
#[derive(Clone, Default, Debug)]
pub struct EnergySystemConfig {
    /// Whether to allow nodes that have neither inflows nor outflows.
    pub allow_unconnected_nodes: bool,
}

/// Rules for turning toolkit-specific node names into canonical names.
///
/// Canonicalization optionally trims the name and collapses inner whitespace
/// runs into a single space, then looks the result up in `aliases`.
#[derive(Clone, Default, Debug)]
pub struct NamingConfig {
    /// Whether to normalize whitespace before looking up aliases.
    pub normalize_whitespace: bool,

    /// Maps toolkit-specific spellings to canonical names.
    pub aliases: BTreeMap<String, String>,
}

/// The series that all toolkits are measured against.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Reference {
    /// The cross-toolkit average of all toolkits that have data.
    #[default]
    Average,
    /// The results of the toolkit with the given label.
    Toolkit(String),
}

impl Reference {
    /// Creates a reference to the toolkit with the given label.
    pub fn toolkit(label: impl Into<String>) -> Self {
        Self::Toolkit(label.into())
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Average => write!(f, "average"),
            Reference::Toolkit(label) => write!(f, "{label}"),
        }
    }
}

/// The normalized error metric used for classifying levels of interest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorMetric {
    /// Normalized mean absolute error.
    #[default]
    Nmae,
    /// Normalized root-mean-square error.
    Nrmse,
    /// Normalized mean bias error. Its absolute value is classified.
    Nmbe,
}

impl std::fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorMetric::Nmae => write!(f, "NMAE"),
            ErrorMetric::Nrmse => write!(f, "NRMSE"),
            ErrorMetric::Nmbe => write!(f, "NMBE"),
        }
    }
}

/// Configuration options for a `ComparisonSession`.
#[derive(Clone, Debug)]
pub struct ComparisonConfig {
    /// Labels of the compared toolkits.  Columns of all comparative tables
    /// follow this order.
    pub models: Vec<String>,

    /// The series every toolkit is compared to.
    pub reference: Reference,

    /// Correlations below this value count as weakly correlated.  Must be in
    /// `[-1, 1]`.
    pub correlation_threshold: f64,

    /// Errors at or above this value count as large.  Must be `>= 0`.
    pub error_threshold: f64,

    /// The error metric that is compared to `error_threshold`.
    pub error_metric: ErrorMetric,

    /// Absolute deviation from the reference, in units of the compared
    /// series, above which a timestep counts as deviating.  Must be `>= 0`.
    pub deviation_threshold: f64,

    /// How node names are canonicalized for this comparison.
    pub naming: NamingConfig,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            reference: Reference::Average,
            correlation_threshold: 0.7,
            error_threshold: 0.1,
            error_metric: ErrorMetric::Nmae,
            deviation_threshold: 0.0,
            naming: NamingConfig::default(),
        }
    }
}

impl ComparisonConfig {
    /// Creates a default configuration for the given toolkit labels.
    pub fn new<S: Into<String>>(models: impl IntoIterator<Item = S>) -> Self {
        Self {
            models: models.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Checks that all options are within their valid ranges.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.models.is_empty() {
            return Err(Error::invalid_config("No models configured."));
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if model.trim().is_empty() {
                return Err(Error::invalid_config("Model labels can't be empty."));
            }
            if !seen.insert(model.as_str()) {
                return Err(Error::invalid_config(format!(
                    "Duplicate model label: {model}"
                )));
            }
        }

        if let Reference::Toolkit(label) = &self.reference {
            if !seen.contains(label.as_str()) {
                return Err(Error::invalid_config(format!(
                    "Reference toolkit `{label}` is not one of the models."
                )));
            }
        }

        if !(-1.0..=1.0).contains(&self.correlation_threshold) {
            return Err(Error::invalid_config(format!(
                "Correlation threshold must be in [-1, 1], got {}.",
                self.correlation_threshold
            )));
        }
        for (name, value) in [
            ("Error threshold", self.error_threshold),
            ("Deviation threshold", self.deviation_threshold),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(Error::invalid_config(format!(
                    "{name} must be a finite value >= 0, got {value}."
                )));
            }
        }

        Ok(())
    }
}
