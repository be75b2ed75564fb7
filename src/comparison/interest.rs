// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Classification of deviations into levels of interest.

use super::metrics::{compute, DeviationSet, Exclusion};
use super::ComparisonSession;
use crate::{ComparisonConfig, ComponentIdentity, ErrorMetric, Reference, SeriesQuantity};

/// How much a toolkit's results for an identity deserve a closer look.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InterestLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterestLevel::Low => write!(f, "low"),
            InterestLevel::Medium => write!(f, "medium"),
            InterestLevel::High => write!(f, "high"),
        }
    }
}

/// Classifies a deviation by its correlation and its error.
///
/// Weak correlation (below `correlation_threshold`, or undefined) and a large
/// error (at or above `error_threshold`, or NaN) each raise the level by one
/// step from [`InterestLevel::Low`].
pub fn classify(
    correlation: Option<f64>,
    error: f64,
    correlation_threshold: f64,
    error_threshold: f64,
) -> InterestLevel {
    let weak_correlation = correlation.map_or(true, |c| c.is_nan() || c < correlation_threshold);
    let large_error = error.is_nan() || error >= error_threshold;

    match (weak_correlation, large_error) {
        (true, true) => InterestLevel::High,
        (false, false) => InterestLevel::Low,
        _ => InterestLevel::Medium,
    }
}

/// The classification of one toolkit for one identity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterestRecord {
    pub toolkit: String,
    pub correlation: Option<f64>,
    /// The configured error metric; for NMBE its absolute value.
    pub error: f64,
    pub level: InterestLevel,
}

/// The classifications of all compared toolkits for one identity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IdentityInterest {
    pub identity: ComponentIdentity,
    /// In model order.
    pub records: Vec<InterestRecord>,
    /// Toolkits that couldn't be compared, in model order.
    pub skipped: Vec<(String, Exclusion)>,
}

impl IdentityInterest {
    pub fn record(&self, toolkit: &str) -> Option<&InterestRecord> {
        self.records.iter().find(|r| r.toolkit == toolkit)
    }
}

/// Classifies the deviations of all toolkits for one identity.
pub fn assess(deviations: &DeviationSet, config: &ComparisonConfig) -> IdentityInterest {
    let records = deviations
        .compared
        .iter()
        .map(|(toolkit, deviation)| {
            let error = deviation.error(config.error_metric);
            InterestRecord {
                toolkit: toolkit.clone(),
                correlation: deviation.correlation,
                error,
                level: classify(
                    deviation.correlation,
                    error,
                    config.correlation_threshold,
                    config.error_threshold,
                ),
            }
        })
        .collect();

    IdentityInterest {
        identity: deviations.identity.clone(),
        records,
        skipped: deviations.skipped.clone(),
    }
}

/// The levels of interest of all identities a quantity applies to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterestReport {
    pub quantity: SeriesQuantity,
    pub reference: Reference,
    pub error_metric: ErrorMetric,
    /// Classified identities, in system order.
    pub entries: Vec<IdentityInterest>,
    /// Identities that couldn't be compared at all.  These are never
    /// classified.
    pub excluded: Vec<(ComponentIdentity, Exclusion)>,
}

impl InterestReport {
    pub fn entry(&self, identity: &ComponentIdentity) -> Option<&IdentityInterest> {
        self.entries.iter().find(|e| e.identity == *identity)
    }

    /// Returns the level of the given toolkit for the given identity.
    pub fn level(&self, identity: &ComponentIdentity, toolkit: &str) -> Option<InterestLevel> {
        self.entry(identity)
            .and_then(|e| e.record(toolkit))
            .map(|r| r.level)
    }

    /// Returns the identities whose level for `toolkit` is at least `level`,
    /// in report order.
    pub fn filtered(&self, toolkit: &str, level: InterestLevel) -> Vec<&ComponentIdentity> {
        self.entries
            .iter()
            .filter(|e| e.record(toolkit).is_some_and(|r| r.level >= level))
            .map(|e| &e.identity)
            .collect()
    }

    /// Returns the identities of high interest for `toolkit`.
    pub fn high(&self, toolkit: &str) -> Vec<&ComponentIdentity> {
        self.filtered(toolkit, InterestLevel::High)
    }

    /// Returns the identities of at least medium interest for `toolkit`.
    pub fn medium(&self, toolkit: &str) -> Vec<&ComponentIdentity> {
        self.filtered(toolkit, InterestLevel::Medium)
    }
}

/// Interest classification.
impl ComparisonSession {
    /// Returns the deviations of all toolkits from the configured reference,
    /// for the given identity.
    pub fn deviations(
        &self,
        quantity: SeriesQuantity,
        identity: &ComponentIdentity,
    ) -> Result<DeviationSet, Exclusion> {
        compute(&self.series_table(quantity, identity), &self.config.reference)
    }

    /// Classifies every identity the quantity applies to.
    pub fn identify(&self, quantity: SeriesQuantity) -> InterestReport {
        let mut entries = vec![];
        let mut excluded = vec![];
        for identity in self.identities(quantity) {
            match self.deviations(quantity, &identity) {
                Ok(deviations) => entries.push(assess(&deviations, &self.config)),
                Err(exclusion) => {
                    tracing::debug!("Not classifying {quantity} of {identity}: {exclusion}.");
                    excluded.push((identity, exclusion));
                }
            }
        }

        tracing::info!(
            "Classified {quantity} of {} identities, {} excluded.",
            entries.len(),
            excluded.len()
        );

        InterestReport {
            quantity,
            reference: self.config.reference.clone(),
            error_metric: self.config.error_metric,
            entries,
            excluded,
        }
    }
}
