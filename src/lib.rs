// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Energy System Comparison

This is a library for comparing the optimization results that different
energy-system modelling toolkits produce for the same energy system.

Toolkits render the same system in slightly different ways: they name
components differently, drop components they consider redundant, and report
loads with their own sign conventions.  This library normalizes their results
into tables keyed by canonical component identities, joins them into
comparative tables, computes how far every toolkit deviates from a reference,
and points out the components and time ranges that deserve a closer look.

## The `Node` and `Edge` traits

The compared system is described by an [`EnergySystem`], instances of which
can be created by passing an iterator of nodes and the edges between them to
the [`try_new`][EnergySystem::try_new] method.

The library doesn't know about the node and edge types of the application and
instead uses traits to interact with them.  To be usable with this library,
node and edge types must implement the [`Node`] and [`Edge`] traits,
respectively.  Check out the documentation for these traits for sample
implementations.

[`try_new`][EnergySystem::try_new] validates the system, for example that
sources have no inflows, sinks have no outflows and transformers and storages
have both.

## The `ToolkitResults` trait

The results of every toolkit are accessed through the [`ToolkitResults`]
trait, which answers queries for node loads, capacities, edge costs and
emissions, states of charge and global results.  Components a toolkit doesn't
report are kept distinct from zero values throughout the library, as
[`Presence::Absent`].

## Comparison sessions

A [`ComparisonSession`] is created from a [`ComparisonConfig`], the energy
system and the results of every configured toolkit.  It provides:

- comparative tables of time series and scalar quantities, via
  [`series_table`][ComparisonSession::series_table] and
  [`scalar_table`][ComparisonSession::scalar_table],
- correlation and normalized errors against the configured reference, via
  [`deviations`][ComparisonSession::deviations],
- levels of interest for every component, via
  [`identify`][ComparisonSession::identify],
- the time ranges in which toolkits deviate from the reference, via
  [`deviating_windows`][ComparisonSession::deviating_windows].
*/

mod comparison;
pub use comparison::{
    assess, build_global_table, build_scalar_table, build_series_table, classify, compute,
    find_deviating_windows, pearson, ComparisonSession, DeviatingWindow, DeviatingWindows,
    Deviation, DeviationSet, Exclusion, GlobalTable, IdentityInterest, InterestLevel,
    InterestRecord, InterestReport, ReferenceSeries, ScalarTable, TimeSeriesTable,
    ToolkitColumns,
};

mod config;
pub use config::{ComparisonConfig, EnergySystemConfig, ErrorMetric, NamingConfig, Reference};

mod error;
pub use error::Error;

mod identity;
pub use identity::ComponentIdentity;

mod node_category;
pub use node_category::NodeCategory;

mod presence;
pub use presence::Presence;

mod result_set;
pub use result_set::{LoadTable, ScalarQuantity, SeriesQuantity, ToolkitResultSet};

mod results_traits;
pub use results_traits::{EdgeLoad, GlobalMetric, GlobalResults, ToolkitResults};

mod series;
pub use series::{TimeIndex, TimeSeries};

mod system;
pub use system::{iterators, EnergySystem, SystemLayout};

mod system_traits;
pub use system_traits::{Edge, Node};
