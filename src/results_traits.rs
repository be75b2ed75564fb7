// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the trait that needs to be implemented by the
//! results of every compared toolkit, and the plain types it returns.

use crate::TimeIndex;

/// The flow along one edge, as reported by a toolkit.
///
/// Values are the energy moved from `source` to `destination` per timestep.
/// NaN marks a missing timestep.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLoad {
    pub source: String,
    pub destination: String,
    pub values: Vec<f64>,
}

impl EdgeLoad {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            values: values.into_iter().collect(),
        }
    }
}

/// Scalar results that describe an optimized system as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlobalResults {
    /// Total emissions caused.
    pub emissions: Option<f64>,
    /// Total costs incurred.
    pub costs: Option<f64>,
    /// Operational expenditure.
    pub opex: Option<f64>,
    /// Capital expenditure.
    pub capex: Option<f64>,
    /// Time it took to build and solve the model, in seconds.
    pub time: Option<f64>,
    /// Peak memory used for building and solving the model, in bytes.
    pub memory: Option<f64>,
}

/// The global result kinds, in the order they appear in comparative tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GlobalMetric {
    Emissions,
    Costs,
    Opex,
    Capex,
    Time,
    Memory,
}

impl GlobalMetric {
    pub const ALL: [GlobalMetric; 6] = [
        GlobalMetric::Emissions,
        GlobalMetric::Costs,
        GlobalMetric::Opex,
        GlobalMetric::Capex,
        GlobalMetric::Time,
        GlobalMetric::Memory,
    ];
}

impl std::fmt::Display for GlobalMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalMetric::Emissions => write!(f, "emissions"),
            GlobalMetric::Costs => write!(f, "costs"),
            GlobalMetric::Opex => write!(f, "opex"),
            GlobalMetric::Capex => write!(f, "capex"),
            GlobalMetric::Time => write!(f, "time"),
            GlobalMetric::Memory => write!(f, "memory"),
        }
    }
}

impl GlobalResults {
    /// Returns the value of the given metric, with NaN treated as missing.
    pub fn get(&self, metric: GlobalMetric) -> Option<f64> {
        let value = match metric {
            GlobalMetric::Emissions => self.emissions,
            GlobalMetric::Costs => self.costs,
            GlobalMetric::Opex => self.opex,
            GlobalMetric::Capex => self.capex,
            GlobalMetric::Time => self.time,
            GlobalMetric::Memory => self.memory,
        };
        value.filter(|v| !v.is_nan())
    }
}

/**
This trait needs to be implemented by the optimization results of every
toolkit that takes part in a comparison.

All names passed to and returned from these methods are node labels of the
canonical energy system.  Returning `None` means that the toolkit's model
doesn't contain the queried component, which is kept distinct from a value
of zero.

<details>
<summary>Example implementation for a toolkit that stores flows in a map:</summary>

```ignore
impl energy_system_comparison::ToolkitResults for MyToolkitRun {
    fn time_index(&self) -> TimeIndex {
        self.timeframe
    }

    fn node_load(&self, node: &str) -> Option<Vec<EdgeLoad>> {
        let flows = self
            .flows
            .iter()
            .filter(|((source, destination), _)| source == node || destination == node)
            .map(|((source, destination), values)| {
                EdgeLoad::new(source, destination, values.iter().copied())
            })
            .collect::<Vec<_>>();
        (!flows.is_empty()).then_some(flows)
    }

    fn node_installed_capacity(&self, node: &str) -> Option<f64> {
        self.capacities.get(node).copied()
    }

    // ...
}
```

</details>
*/
pub trait ToolkitResults {
    /// Returns the time index of all series reported by the toolkit.
    fn time_index(&self) -> TimeIndex;

    /// Returns the flows along all edges connected to the node.
    fn node_load(&self, node: &str) -> Option<Vec<EdgeLoad>>;

    /// Returns the capacity of the node after optimization.
    fn node_installed_capacity(&self, node: &str) -> Option<f64>;

    /// Returns the capacity of the node before optimization.
    fn node_original_capacity(&self, node: &str) -> Option<f64>;

    /// Returns the cost of expanding the node's capacity by one unit.
    fn node_expansion_cost(&self, node: &str) -> Option<f64> {
        let _ = node;
        None
    }

    /// Returns the cost of moving one unit of energy along the edge.
    fn edge_specific_cost(&self, source: &str, destination: &str) -> Option<f64>;

    /// Returns the emissions caused by moving one unit of energy along the
    /// edge.
    fn edge_specific_emission(&self, source: &str, destination: &str) -> Option<f64>;

    /// Returns the state of charge of the storage node.
    fn node_soc(&self, node: &str) -> Option<Vec<f64>>;

    /// Returns the scalar results of the whole system.
    fn global_results(&self) -> GlobalResults;
}
