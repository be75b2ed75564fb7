// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests that need an energy system.
//!
//! - the `TestNode` and `TestEdge` types, which implement the `Node` and
//!   `Edge` traits respectively.
//! - the `EnergySystemBuilder`, which can declaratively build energy systems
//!   for use in tests.

use crate::{Edge, EnergySystem, EnergySystemConfig, Error, Node, NodeCategory};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestNode(String, NodeCategory);

impl TestNode {
    pub(crate) fn new(label: &str, category: NodeCategory) -> Self {
        TestNode(label.to_string(), category)
    }
}

impl Node for TestNode {
    fn label(&self) -> &str {
        &self.0
    }

    fn category(&self) -> NodeCategory {
        self.1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestEdge(String, String);

impl TestEdge {
    pub(crate) fn new(source: &str, destination: &str) -> Self {
        TestEdge(source.to_string(), destination.to_string())
    }
}

impl Edge for TestEdge {
    fn source(&self) -> &str {
        &self.0
    }

    fn destination(&self) -> &str {
        &self.1
    }
}

/// Represents a node added to the `EnergySystemBuilder`.
#[derive(Eq, Hash, PartialEq, Copy, Clone)]
pub(crate) struct NodeHandle(usize);

/// A builder for creating energy systems easily, for use in tests.
pub(crate) struct EnergySystemBuilder {
    nodes: Vec<TestNode>,
    edges: Vec<TestEdge>,
}

impl EnergySystemBuilder {
    /// Creates a new `EnergySystemBuilder`.
    pub(crate) fn new() -> Self {
        EnergySystemBuilder {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node to the system and returns its handle.
    pub(crate) fn add_node(&mut self, label: &str, category: NodeCategory) -> NodeHandle {
        self.nodes.push(TestNode::new(label, category));
        NodeHandle(self.nodes.len() - 1)
    }

    pub(crate) fn source(&mut self, label: &str) -> NodeHandle {
        self.add_node(label, NodeCategory::Source)
    }

    pub(crate) fn sink(&mut self, label: &str) -> NodeHandle {
        self.add_node(label, NodeCategory::Sink)
    }

    pub(crate) fn transformer(&mut self, label: &str) -> NodeHandle {
        self.add_node(label, NodeCategory::Transformer)
    }

    pub(crate) fn storage(&mut self, label: &str) -> NodeHandle {
        self.add_node(label, NodeCategory::Storage)
    }

    pub(crate) fn connector(&mut self, label: &str) -> NodeHandle {
        self.add_node(label, NodeCategory::Connector)
    }

    pub(crate) fn bus(&mut self, label: &str) -> NodeHandle {
        self.add_node(label, NodeCategory::Bus)
    }

    /// Connects two nodes in the system.
    pub(crate) fn connect(&mut self, from: NodeHandle, to: NodeHandle) -> &mut Self {
        let edge = TestEdge::new(self.nodes[from.0].label(), self.nodes[to.0].label());
        self.edges.push(edge);
        self
    }

    /// Builds the combined heat and power example: a gas source feeding a
    /// CHP, a battery on the power bus, and power and heat demands.
    pub(crate) fn chp_system() -> Self {
        let mut builder = Self::new();
        let gas_source = builder.source("Gas Source");
        let gas_grid = builder.bus("Gas Grid");
        let chp = builder.transformer("CHP");
        let powerline = builder.bus("Powerline");
        let heat_grid = builder.bus("Heat Grid");
        let battery = builder.storage("Battery");
        let power_demand = builder.sink("Power Demand");
        let heat_demand = builder.sink("Heat Demand");

        builder
            .connect(gas_source, gas_grid)
            .connect(gas_grid, chp)
            .connect(chp, powerline)
            .connect(chp, heat_grid)
            .connect(powerline, battery)
            .connect(battery, powerline)
            .connect(powerline, power_demand)
            .connect(heat_grid, heat_demand);
        builder
    }

    /// Builds a minimal power system: a source feeding a demand through a
    /// bus.
    pub(crate) fn power_system() -> Self {
        let mut builder = Self::new();
        let source = builder.source("Power Source");
        let grid = builder.bus("Power Grid");
        let demand = builder.sink("Power Demand");

        builder.connect(source, grid).connect(grid, demand);
        builder
    }

    /// Builds and returns the energy system from the nodes and edges added to
    /// the builder.
    pub(crate) fn build(
        &self,
        config: Option<EnergySystemConfig>,
    ) -> Result<EnergySystem<TestNode, TestEdge>, Error> {
        EnergySystem::try_new(
            self.nodes.clone(),
            self.edges.clone(),
            config.unwrap_or_default(),
        )
    }
}
