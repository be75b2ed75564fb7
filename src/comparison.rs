// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Comparison of the results of several toolkits that optimized the same
//! energy system.

mod aggregation;
mod creation;
mod interest;
mod metrics;
mod tables;
mod timeframes;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregation::{build_global_table, build_scalar_table, build_series_table};
pub use interest::{
    assess, classify, IdentityInterest, InterestLevel, InterestRecord, InterestReport,
};
pub use metrics::{compute, pearson, Deviation, DeviationSet, Exclusion};
pub use tables::{GlobalTable, ReferenceSeries, ScalarTable, TimeSeriesTable, ToolkitColumns};
pub use timeframes::{find_deviating_windows, DeviatingWindow, DeviatingWindows};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    ComparisonConfig, ComponentIdentity, ScalarQuantity, SeriesQuantity, SystemLayout, TimeIndex,
    ToolkitResultSet,
};

/// Memoized comparative tables, keyed by quantity and identity.
type TableCache<Q, T> = RefCell<HashMap<(Q, ComponentIdentity), Rc<T>>>;

/// A comparison of the results of several toolkits for one energy system.
///
/// Result sets are normalized once when the session is created.  Comparative
/// tables are built on first use and cached for the lifetime of the session,
/// so repeated requests return the same table.
pub struct ComparisonSession {
    config: ComparisonConfig,
    layout: SystemLayout,
    time_index: TimeIndex,
    result_sets: Vec<ToolkitResultSet>,
    series_tables: TableCache<SeriesQuantity, TimeSeriesTable>,
    scalar_tables: TableCache<ScalarQuantity, ScalarTable>,
}
