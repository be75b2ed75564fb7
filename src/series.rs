// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The shared time index and the time series that are compared over it.

use std::ops::Range;

use chrono::{NaiveDateTime, TimeDelta};

use crate::Error;

/// A regular time index, shared by all toolkits of one comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeIndex {
    start: NaiveDateTime,
    step: TimeDelta,
    len: usize,
}

impl TimeIndex {
    /// Creates a time index of `len` timestamps, starting at `start` and
    /// spaced `step` apart.
    ///
    /// Returns an error if `step` isn't positive.
    pub fn try_new(start: NaiveDateTime, step: TimeDelta, len: usize) -> Result<Self, Error> {
        if step <= TimeDelta::zero() {
            return Err(Error::invalid_results(format!(
                "Time index step must be positive, got {step}."
            )));
        }
        Ok(Self { start, step, len })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the timestamp at position `i`, if it is part of the index.
    pub fn timestamp(&self, i: usize) -> Option<NaiveDateTime> {
        if i >= self.len {
            return None;
        }
        i32::try_from(i)
            .ok()
            .and_then(|i| self.step.checked_mul(i))
            .and_then(|offset| self.start.checked_add_signed(offset))
    }

    /// Returns an iterator over all timestamps, in chronological order.
    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).filter_map(|i| self.timestamp(i))
    }

    /// Returns the part of the index covered by `range`, clipped to the
    /// index bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len);
        let start = range.start.min(end);
        Self {
            start: self.timestamp(start).unwrap_or(self.start),
            step: self.step,
            len: end - start,
        }
    }
}

/// A sequence of values over a [`TimeIndex`].
///
/// Missing timesteps are kept as `None`, so positions always line up with the
/// time index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Creates a series from raw values.  NaN values become missing values.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        Self::from_options(values.into_iter().map(Some))
    }

    /// Creates a series from optional values.  NaN values become missing
    /// values.
    pub fn from_options(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.filter(|v| !v.is_nan()))
                .collect(),
        }
    }

    /// Creates a series of `len` missing values.
    pub fn missing(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at position `i`, or `None` if it is missing.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Returns an iterator over the values that are present.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    /// Returns true if no value is present.
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Returns the sum of the present values, or `None` if none are present.
    pub fn sum(&self) -> Option<f64> {
        self.present()
            .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
    }

    /// Returns the mean of the present values, or `None` if none are present.
    pub fn mean(&self) -> Option<f64> {
        let count = self.present().count();
        self.sum().map(|sum| sum / count as f64)
    }

    /// Returns the series with all values negated.
    pub fn negated(&self) -> Self {
        Self {
            values: self.values.iter().map(|v| v.map(|v| -v)).collect(),
        }
    }

    /// Returns the part of the series covered by `range`, clipped to the
    /// series bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            values: self.values[start..end].to_vec(),
        }
    }

    /// Adds `other` element-wise.  A position is missing in the result only
    /// if it is missing in both series.
    pub(crate) fn add_present(&mut self, other: &TimeSeries) {
        for (lhs, rhs) in self.values.iter_mut().zip(other.values.iter()) {
            if let Some(rhs) = rhs {
                *lhs = Some(lhs.unwrap_or(0.0) + rhs);
            }
        }
    }
}
