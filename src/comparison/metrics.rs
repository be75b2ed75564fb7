// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Correlation and normalized error metrics between toolkit series and a
//! reference series.

use crate::{ComponentIdentity, ErrorMetric, Reference};

use super::tables::TimeSeriesTable;

/// The reason an identity or a toolkit is left out of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Exclusion {
    /// No toolkit reports the identity.
    NoData,
    /// The reference series is absent, empty or entirely missing.
    DegenerateReference,
    /// Only one toolkit reports the identity, so there is nothing to compare
    /// it with.
    Unshared,
    /// The toolkit doesn't report the identity.
    Absent,
    /// The toolkit and the reference have no timestamp with a value in common.
    NoOverlap,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exclusion::NoData => write!(f, "no toolkit has data"),
            Exclusion::DegenerateReference => write!(f, "reference has no data"),
            Exclusion::Unshared => write!(f, "only one toolkit has data"),
            Exclusion::Absent => write!(f, "not present in toolkit"),
            Exclusion::NoOverlap => write!(f, "no overlap with reference"),
        }
    }
}

/// How far a toolkit's series deviates from the reference series.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Deviation {
    /// Pearson correlation coefficient, `None` if it is undefined.
    pub correlation: Option<f64>,
    pub nmae: f64,
    pub nrmse: f64,
    /// Signed: positive when the toolkit overestimates the reference.
    pub nmbe: f64,
    /// Number of timestamps where both series have a value.
    pub overlap: usize,
}

impl Deviation {
    /// Computes the deviation of `series` from `reference`, using only the
    /// positions where both have a value.
    ///
    /// Returns `None` if there is no such position.
    pub fn between(series: &[Option<f64>], reference: &[Option<f64>]) -> Option<Self> {
        let pairs = overlap(series, reference);
        if pairs.is_empty() {
            return None;
        }

        let n = pairs.len() as f64;
        let scale = pairs.iter().map(|(_, r)| r.abs()).sum::<f64>() / n;
        let abs_error = pairs.iter().map(|(x, r)| (x - r).abs()).sum::<f64>() / n;
        let sq_error = pairs.iter().map(|(x, r)| (x - r).powi(2)).sum::<f64>() / n;
        let bias = pairs.iter().map(|(x, r)| x - r).sum::<f64>() / n;

        Some(Self {
            correlation: pearson_of_pairs(&pairs),
            nmae: normalize(abs_error, scale),
            nrmse: normalize(sq_error.sqrt(), scale),
            nmbe: normalize(bias, scale),
            overlap: pairs.len(),
        })
    }

    /// Returns the magnitude of the given error metric, as used for
    /// classification.
    pub fn error(&self, metric: ErrorMetric) -> f64 {
        match metric {
            ErrorMetric::Nmae => self.nmae,
            ErrorMetric::Nrmse => self.nrmse,
            ErrorMetric::Nmbe => self.nmbe.abs(),
        }
    }
}

/// Returns the Pearson correlation coefficient of the positions where both
/// series have a value.
///
/// Returns `None` for fewer than two such positions, or when either side has
/// zero variance.  Identical series correlate perfectly, even when constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    pearson_of_pairs(&overlap(x, y))
}

fn pearson_of_pairs(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    if pairs.iter().all(|(x, y)| x == y) {
        return Some(1.0);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

fn overlap(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

fn normalize(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else if numerator == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(numerator)
    }
}

/// The deviations of all toolkits from the reference, for one identity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviationSet {
    pub identity: ComponentIdentity,
    pub reference: Reference,
    /// Toolkits that could be compared, in model order.
    pub compared: Vec<(String, Deviation)>,
    /// Toolkits that were skipped, in model order.
    pub skipped: Vec<(String, Exclusion)>,
}

impl DeviationSet {
    /// Returns the deviation of the given toolkit, if it was compared.
    pub fn get(&self, toolkit: &str) -> Option<&Deviation> {
        self.compared
            .iter()
            .find(|(label, _)| label == toolkit)
            .map(|(_, deviation)| deviation)
    }
}

/// Computes the deviation of every toolkit in `table` from the reference.
///
/// Returns an [`Exclusion`] if the identity can't be compared at all.
pub fn compute(table: &TimeSeriesTable, reference: &Reference) -> Result<DeviationSet, Exclusion> {
    if table.is_empty() {
        return Err(Exclusion::NoData);
    }
    let reference_series = match table.reference(reference) {
        Some(series) if !series.is_degenerate() => series,
        _ => return Err(Exclusion::DegenerateReference),
    };
    if table.present_toolkits().count() < 2 {
        return Err(Exclusion::Unshared);
    }
    let flat_reference = reference_series.flattened();

    let mut compared = vec![];
    let mut skipped = vec![];
    for columns in table.columns() {
        let toolkit = columns.toolkit().to_string();
        let Some(series) = table.flattened(&toolkit) else {
            skipped.push((toolkit, Exclusion::Absent));
            continue;
        };
        match Deviation::between(&series, &flat_reference) {
            Some(deviation) => compared.push((toolkit, deviation)),
            None => skipped.push((toolkit, Exclusion::NoOverlap)),
        }
    }

    Ok(DeviationSet {
        identity: table.identity().clone(),
        reference: reference.clone(),
        compared,
        skipped,
    })
}
