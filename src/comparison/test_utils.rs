// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains the
//! `TestToolkit`, an in-memory implementation of the `ToolkitResults` trait
//! that can be built declaratively.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, TimeDelta};

use crate::system::test_utils::EnergySystemBuilder;
use crate::{
    ComparisonConfig, ComparisonSession, EdgeLoad, Error, GlobalResults, NamingConfig, TimeIndex,
    ToolkitResults,
};

/// Returns an hourly time index of `len` steps, starting on 2022-01-01.
pub(crate) fn hourly_index(len: usize) -> TimeIndex {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    TimeIndex::try_new(start, TimeDelta::hours(1), len).unwrap()
}

#[derive(Clone, Debug)]
pub(crate) struct TestToolkit {
    time_index: TimeIndex,
    naming: NamingConfig,
    flows: Vec<EdgeLoad>,
    absent_nodes: HashSet<String>,
    installed_capacities: HashMap<String, f64>,
    original_capacities: HashMap<String, f64>,
    expansion_costs: HashMap<String, f64>,
    edge_costs: HashMap<(String, String), f64>,
    edge_emissions: HashMap<(String, String), f64>,
    soc: HashMap<String, Vec<f64>>,
    global: GlobalResults,
}

impl TestToolkit {
    pub(crate) fn new(time_index: TimeIndex) -> Self {
        Self {
            time_index,
            naming: NamingConfig::default(),
            flows: vec![],
            absent_nodes: HashSet::new(),
            installed_capacities: HashMap::new(),
            original_capacities: HashMap::new(),
            expansion_costs: HashMap::new(),
            edge_costs: HashMap::new(),
            edge_emissions: HashMap::new(),
            soc: HashMap::new(),
            global: GlobalResults::default(),
        }
    }

    /// Sets the naming rules used to match queried names to the raw labels
    /// the toolkit reports.
    pub(crate) fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    pub(crate) fn with_flow<const N: usize>(
        mut self,
        source: &str,
        destination: &str,
        values: [f64; N],
    ) -> Self {
        self.flows.push(EdgeLoad::new(source, destination, values));
        self
    }

    /// Marks a node as structurally eliminated from the toolkit's model.
    pub(crate) fn without_node(mut self, node: &str) -> Self {
        self.absent_nodes.insert(node.to_string());
        self
    }

    pub(crate) fn with_installed_capacity(mut self, node: &str, value: f64) -> Self {
        self.installed_capacities.insert(node.to_string(), value);
        self
    }

    pub(crate) fn with_original_capacity(mut self, node: &str, value: f64) -> Self {
        self.original_capacities.insert(node.to_string(), value);
        self
    }

    pub(crate) fn with_expansion_cost(mut self, node: &str, value: f64) -> Self {
        self.expansion_costs.insert(node.to_string(), value);
        self
    }

    pub(crate) fn with_edge_cost(mut self, source: &str, destination: &str, value: f64) -> Self {
        self.edge_costs
            .insert((source.to_string(), destination.to_string()), value);
        self
    }

    pub(crate) fn with_edge_emission(
        mut self,
        source: &str,
        destination: &str,
        value: f64,
    ) -> Self {
        self.edge_emissions
            .insert((source.to_string(), destination.to_string()), value);
        self
    }

    pub(crate) fn with_soc<const N: usize>(mut self, node: &str, values: [f64; N]) -> Self {
        self.soc.insert(node.to_string(), values.to_vec());
        self
    }

    pub(crate) fn with_global(mut self, global: GlobalResults) -> Self {
        self.global = global;
        self
    }

    fn matches(&self, raw: &str, canonical: &str) -> bool {
        self.naming.canonicalize(raw) == canonical
    }
}

impl ToolkitResults for TestToolkit {
    fn time_index(&self) -> TimeIndex {
        self.time_index
    }

    fn node_load(&self, node: &str) -> Option<Vec<EdgeLoad>> {
        if self.absent_nodes.contains(node) {
            return None;
        }
        Some(
            self.flows
                .iter()
                .filter(|f| self.matches(&f.source, node) || self.matches(&f.destination, node))
                .cloned()
                .collect(),
        )
    }

    fn node_installed_capacity(&self, node: &str) -> Option<f64> {
        self.installed_capacities.get(node).copied()
    }

    fn node_original_capacity(&self, node: &str) -> Option<f64> {
        self.original_capacities.get(node).copied()
    }

    fn node_expansion_cost(&self, node: &str) -> Option<f64> {
        self.expansion_costs.get(node).copied()
    }

    fn edge_specific_cost(&self, source: &str, destination: &str) -> Option<f64> {
        self.edge_costs
            .get(&(source.to_string(), destination.to_string()))
            .copied()
    }

    fn edge_specific_emission(&self, source: &str, destination: &str) -> Option<f64> {
        self.edge_emissions
            .get(&(source.to_string(), destination.to_string()))
            .copied()
    }

    fn node_soc(&self, node: &str) -> Option<Vec<f64>> {
        self.soc.get(node).cloned()
    }

    fn global_results(&self) -> GlobalResults {
        self.global.clone()
    }
}

/// Creates a session for the system built by `builder`, with the given
/// toolkits.
pub(crate) fn new_session(
    builder: &EnergySystemBuilder,
    config: ComparisonConfig,
    toolkits: &[(&str, TestToolkit)],
) -> Result<ComparisonSession, Error> {
    let system = builder.build(None)?;
    ComparisonSession::try_new(
        config,
        &system,
        toolkits
            .iter()
            .map(|(label, toolkit)| (*label, toolkit as &dyn ToolkitResults)),
    )
}
