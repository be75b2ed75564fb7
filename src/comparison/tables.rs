// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Comparative tables, joining the results of all toolkits for one identity.

use std::fmt::Display;
use std::ops::Range;

use chrono::NaiveDateTime;

use crate::{
    ComponentIdentity, GlobalMetric, Presence, Reference, ScalarQuantity, SeriesQuantity,
    TimeIndex, TimeSeries,
};

/// The columns of one toolkit in a [`TimeSeriesTable`], one series per
/// sub-component.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolkitColumns {
    pub(crate) toolkit: String,
    pub(crate) series: Presence<Vec<TimeSeries>>,
}

impl ToolkitColumns {
    pub fn toolkit(&self) -> &str {
        &self.toolkit
    }

    /// Returns one series per sub-component of the table, or `Absent` if the
    /// toolkit doesn't report the identity.
    pub fn series(&self) -> Presence<&[TimeSeries]> {
        match &self.series {
            Presence::Present(series) => Presence::Present(series.as_slice()),
            Presence::Absent => Presence::Absent,
        }
    }
}

/// A time-indexed comparative table.
///
/// Columns have two levels: the outer level is the toolkit, in the configured
/// model order, and the inner level is the sub-component (for loads, the
/// inflow or outflow edge).  Rows are chronological.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesTable {
    pub(crate) identity: ComponentIdentity,
    pub(crate) quantity: SeriesQuantity,
    pub(crate) time_index: TimeIndex,
    pub(crate) sub_components: Vec<String>,
    pub(crate) columns: Vec<ToolkitColumns>,
}

impl TimeSeriesTable {
    pub fn identity(&self) -> &ComponentIdentity {
        &self.identity
    }

    pub fn quantity(&self) -> SeriesQuantity {
        self.quantity
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.time_index.len()
    }

    /// Returns true if no toolkit reports the identity.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.series.is_absent())
    }

    pub fn sub_components(&self) -> &[String] {
        &self.sub_components
    }

    /// Returns the columns of all toolkits, in model order.
    pub fn columns(&self) -> &[ToolkitColumns] {
        &self.columns
    }

    /// Returns an iterator over the labels of the toolkits that report the
    /// identity.
    pub fn present_toolkits(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.series.is_present())
            .map(|c| c.toolkit.as_str())
    }

    /// Returns the series of the given toolkit, one per sub-component.
    pub fn toolkit(&self, label: &str) -> Presence<&[TimeSeries]> {
        self.columns
            .iter()
            .find(|c| c.toolkit == label)
            .map_or(Presence::Absent, ToolkitColumns::series)
    }

    /// Returns the series of the given toolkit with all sub-components
    /// concatenated in table order.
    pub fn flattened(&self, label: &str) -> Option<Vec<Option<f64>>> {
        self.toolkit(label).present().map(flatten)
    }

    /// Returns the per-timestep mean over all toolkits that have a value,
    /// computed separately for every sub-component.
    ///
    /// Toolkits that don't report the identity, or miss a timestep, are left
    /// out of the mean rather than counted as zero.
    pub fn average(&self) -> ReferenceSeries {
        let series = (0..self.sub_components.len())
            .map(|sub| {
                TimeSeries::from_options((0..self.len()).map(|row| {
                    let values = self
                        .columns
                        .iter()
                        .filter_map(|c| c.series.as_ref().present())
                        .filter_map(|series| series.get(sub).and_then(|s| s.get(row)))
                        .collect::<Vec<_>>();
                    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
                }))
            })
            .collect();

        ReferenceSeries {
            sub_components: self.sub_components.clone(),
            series,
        }
    }

    /// Returns the series every toolkit is compared to, or `None` if the
    /// reference toolkit doesn't report the identity.
    pub fn reference(&self, reference: &Reference) -> Option<ReferenceSeries> {
        match reference {
            Reference::Average => Some(self.average()),
            Reference::Toolkit(label) => {
                self.toolkit(label).present().map(|series| ReferenceSeries {
                    sub_components: self.sub_components.clone(),
                    series: series.to_vec(),
                })
            }
        }
    }

    /// Returns the rows covered by `range`, clipped to the table bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            identity: self.identity.clone(),
            quantity: self.quantity,
            time_index: self.time_index.slice(range.clone()),
            sub_components: self.sub_components.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| ToolkitColumns {
                    toolkit: c.toolkit.clone(),
                    series: c.series.as_ref().map(|series| {
                        series.iter().map(|s| s.slice(range.clone())).collect()
                    }),
                })
                .collect(),
        }
    }

    /// Returns the labels of all present columns as `toolkit/sub-component`,
    /// in the order of the values returned by [`rows`][Self::rows].
    pub fn column_labels(&self) -> Vec<String> {
        self.present_toolkits()
            .flat_map(|toolkit| {
                self.sub_components
                    .iter()
                    .map(move |sub| format!("{toolkit}/{sub}"))
            })
            .collect()
    }

    /// Returns an iterator over the rows of the table, with the values of all
    /// present columns.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDateTime, Vec<Option<f64>>)> + '_ {
        self.time_index
            .timestamps()
            .enumerate()
            .map(move |(row, timestamp)| {
                let values = self
                    .columns
                    .iter()
                    .filter_map(|c| c.series.as_ref().present())
                    .flat_map(|series| series.iter().map(move |s| s.get(row)))
                    .collect();
                (timestamp, values)
            })
    }
}

impl Display for TimeSeriesTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timestamp")?;
        for label in self.column_labels() {
            write!(f, ",{label}")?;
        }
        writeln!(f)?;
        for (timestamp, values) in self.rows() {
            write!(f, "{timestamp}")?;
            for value in values {
                write_value(f, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The series toolkits are compared to, one per sub-component of the table
/// it was derived from.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceSeries {
    pub(crate) sub_components: Vec<String>,
    pub(crate) series: Vec<TimeSeries>,
}

impl ReferenceSeries {
    pub fn sub_components(&self) -> &[String] {
        &self.sub_components
    }

    pub fn series(&self) -> &[TimeSeries] {
        &self.series
    }

    /// Returns all sub-components concatenated in table order.
    pub fn flattened(&self) -> Vec<Option<f64>> {
        flatten(&self.series)
    }

    /// Returns true if the reference has no values to compare against.
    pub fn is_degenerate(&self) -> bool {
        self.series.iter().all(TimeSeries::is_all_missing)
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            sub_components: self.sub_components.clone(),
            series: self.series.iter().map(|s| s.slice(range.clone())).collect(),
        }
    }
}

fn flatten(series: &[TimeSeries]) -> Vec<Option<f64>> {
    series
        .iter()
        .flat_map(|s| s.values().iter().copied())
        .collect()
}

/// A comparative table of a scalar quantity: one row per toolkit, in model
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarTable {
    pub(crate) identity: ComponentIdentity,
    pub(crate) quantity: ScalarQuantity,
    pub(crate) rows: Vec<(String, Presence<f64>)>,
}

impl ScalarTable {
    pub fn identity(&self) -> &ComponentIdentity {
        &self.identity
    }

    pub fn quantity(&self) -> ScalarQuantity {
        self.quantity
    }

    pub fn rows(&self) -> &[(String, Presence<f64>)] {
        &self.rows
    }

    /// Returns the value reported by the given toolkit.
    pub fn value(&self, toolkit: &str) -> Presence<f64> {
        self.rows
            .iter()
            .find(|(label, _)| label == toolkit)
            .map_or(Presence::Absent, |(_, value)| *value)
    }

    /// Returns true if no toolkit reports the identity.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|(_, value)| value.is_absent())
    }

    /// Returns the mean over all toolkits that report the identity.
    pub fn average(&self) -> Option<f64> {
        let values = self
            .rows
            .iter()
            .filter_map(|(_, value)| value.present())
            .collect::<Vec<_>>();
        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    }
}

impl Display for ScalarTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "toolkit,{}", self.quantity)?;
        for (toolkit, value) in &self.rows {
            write!(f, "{toolkit}")?;
            write_value(f, value.present())?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The global results of all toolkits: one row per metric, one column per
/// toolkit.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalTable {
    pub(crate) toolkits: Vec<String>,
    pub(crate) rows: Vec<(GlobalMetric, Vec<Option<f64>>)>,
}

impl GlobalTable {
    pub fn toolkits(&self) -> &[String] {
        &self.toolkits
    }

    pub fn rows(&self) -> &[(GlobalMetric, Vec<Option<f64>>)] {
        &self.rows
    }

    /// Returns the value of `metric` reported by `toolkit`.
    pub fn value(&self, metric: GlobalMetric, toolkit: &str) -> Option<f64> {
        let column = self.toolkits.iter().position(|t| t == toolkit)?;
        self.rows
            .iter()
            .find(|(m, _)| *m == metric)
            .and_then(|(_, values)| values[column])
    }
}

impl Display for GlobalTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "metric")?;
        for toolkit in &self.toolkits {
            write!(f, ",{toolkit}")?;
        }
        writeln!(f)?;
        for (metric, values) in &self.rows {
            write!(f, "{metric}")?;
            for value in values {
                write_value(f, *value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_value(f: &mut std::fmt::Formatter<'_>, value: Option<f64>) -> std::fmt::Result {
    match value {
        Some(value) => write!(f, ",{value}"),
        None => write!(f, ","),
    }
}
