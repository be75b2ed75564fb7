// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The explicit marker for components that a toolkit doesn't report.

/// Whether a toolkit reports a value for a component.
///
/// A toolkit can structurally eliminate a component that other toolkits keep,
/// so "not present" carries information and must never be confused with zero
/// or with a missing timestep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Presence<T> {
    Present(T),
    Absent,
}

impl<T> Presence<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Self::Present(value) => Presence::Present(value),
            Self::Absent => Presence::Absent,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Presence<U> {
        match self {
            Self::Present(value) => Presence::Present(f(value)),
            Self::Absent => Presence::Absent,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Presence<U>) -> Presence<U> {
        match self {
            Self::Present(value) => f(value),
            Self::Absent => Presence::Absent,
        }
    }

    /// Converts into an `Option`, dropping the distinction to other kinds of
    /// missing data.
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }
}

impl Presence<f64> {
    /// Converts a scalar reported by a toolkit, treating NaN as absent.
    pub(crate) fn from_scalar(value: Option<f64>) -> Self {
        value.filter(|v| !v.is_nan()).into()
    }
}
