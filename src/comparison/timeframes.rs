// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Finding the time ranges in which toolkits deviate from the reference.

use std::iter::FusedIterator;
use std::ops::{Range, RangeInclusive};

use chrono::NaiveDateTime;

use super::metrics::{Deviation, Exclusion};
use super::tables::{ReferenceSeries, TimeSeriesTable};
use super::ComparisonSession;
use crate::{ComponentIdentity, SeriesQuantity};

/// A contiguous run of deviating rows, with one row of context on each side
/// where the table has one.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviatingWindow {
    rows: Range<usize>,
    deviating: RangeInclusive<usize>,
    table: TimeSeriesTable,
    reference: ReferenceSeries,
}

impl DeviatingWindow {
    /// Returns the rows of the original table covered by the window.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Returns the rows of the original table that deviate.
    pub fn deviating_rows(&self) -> RangeInclusive<usize> {
        self.deviating.clone()
    }

    /// Returns the timestamp of the first row of the window.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.table.time_index().timestamp(0)
    }

    /// Returns the timestamp of the last row of the window.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.table
            .len()
            .checked_sub(1)
            .and_then(|last| self.table.time_index().timestamp(last))
    }

    /// Returns the slice of the table covered by the window.
    pub fn table(&self) -> &TimeSeriesTable {
        &self.table
    }

    /// Returns the slice of the reference covered by the window.
    pub fn reference(&self) -> &ReferenceSeries {
        &self.reference
    }

    /// Returns the deviation of every toolkit from the reference within the
    /// window, in model order.
    pub fn deviations(&self) -> Vec<(String, Result<Deviation, Exclusion>)> {
        let reference = self.reference.flattened();
        self.table
            .columns()
            .iter()
            .map(|c| {
                let deviation = match self.table.flattened(c.toolkit()) {
                    Some(series) => {
                        Deviation::between(&series, &reference).ok_or(Exclusion::NoOverlap)
                    }
                    None => Err(Exclusion::Absent),
                };
                (c.toolkit().to_string(), deviation)
            })
            .collect()
    }
}

/// An iterator over the [`DeviatingWindow`]s of a table, in chronological
/// order.
///
/// Windows are found lazily.  Cloning the iterator restarts the search from
/// the clone's current position.
#[derive(Clone, Debug)]
pub struct DeviatingWindows<'a> {
    table: &'a TimeSeriesTable,
    reference: &'a ReferenceSeries,
    threshold: f64,
    next_row: usize,
}

impl DeviatingWindows<'_> {
    fn is_deviating(&self, row: usize) -> bool {
        self.table
            .columns()
            .iter()
            .filter_map(|c| c.series().present())
            .any(|series| {
                series
                    .iter()
                    .zip(self.reference.series())
                    .any(|(s, r)| match (s.get(row), r.get(row)) {
                        (Some(s), Some(r)) => (s - r).abs() > self.threshold,
                        _ => false,
                    })
            })
    }
}

impl Iterator for DeviatingWindows<'_> {
    type Item = DeviatingWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.table.len();
        let mut row = self.next_row;
        while row < len && !self.is_deviating(row) {
            row += 1;
        }
        if row >= len {
            self.next_row = len;
            return None;
        }

        let first = row;
        while row + 1 < len && self.is_deviating(row + 1) {
            row += 1;
        }
        let last = row;
        self.next_row = last + 1;

        let rows = first.saturating_sub(1)..(last + 2).min(len);
        Some(DeviatingWindow {
            table: self.table.slice(rows.clone()),
            reference: self.reference.slice(rows.clone()),
            rows,
            deviating: first..=last,
        })
    }
}

impl FusedIterator for DeviatingWindows<'_> {}

/// Returns an iterator over the windows in which any toolkit of `table`
/// differs from `reference` by more than `threshold`.
///
/// Rows where either side is missing never deviate.  Each run of deviating
/// rows forms its own window, even when the padded windows of two runs touch
/// or overlap.
pub fn find_deviating_windows<'a>(
    table: &'a TimeSeriesTable,
    reference: &'a ReferenceSeries,
    threshold: f64,
) -> DeviatingWindows<'a> {
    DeviatingWindows {
        table,
        reference,
        threshold,
        next_row: 0,
    }
}

/// Deviating time ranges.
impl ComparisonSession {
    /// Returns the windows in which any toolkit deviates from the configured
    /// reference by more than the configured deviation threshold.
    pub fn deviating_windows(
        &self,
        quantity: SeriesQuantity,
        identity: &ComponentIdentity,
    ) -> Result<Vec<DeviatingWindow>, Exclusion> {
        let table = self.series_table(quantity, identity);
        if table.is_empty() {
            return Err(Exclusion::NoData);
        }
        let reference = match table.reference(&self.config.reference) {
            Some(reference) if !reference.is_degenerate() => reference,
            _ => return Err(Exclusion::DegenerateReference),
        };

        let windows = find_deviating_windows(&table, &reference, self.config.deviation_threshold)
            .collect::<Vec<_>>();
        tracing::debug!(
            "Found {} deviating windows for {quantity} of {identity}.",
            windows.len()
        );
        Ok(windows)
    }
}
