// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating that all nodes in an [`EnergySystem`] are
//! connected correctly.

use crate::{node_category::CategoryPredicates, Edge, Error, Node};

use super::EnergySystemValidator;

impl<N, E> EnergySystemValidator<'_, N, E>
where
    N: Node,
    E: Edge,
{
    /// Validates that every node has at least one edge, unless unconnected
    /// nodes are allowed by the config.
    pub(super) fn validate_connectedness(&self) -> Result<(), Error> {
        if self.system.config.allow_unconnected_nodes {
            return Ok(());
        }

        let mut unconnected = vec![];
        for node in self.system.nodes() {
            if self.system.predecessors(node.label())?.next().is_none()
                && self.system.successors(node.label())?.next().is_none()
            {
                unconnected.push(node.label());
            }
        }

        if !unconnected.is_empty() {
            return Err(Error::invalid_system(format!(
                "Nodes {:?} are not connected to the system.",
                unconnected
            )));
        }

        Ok(())
    }

    /// Validates that sources don't have any inflows.
    pub(super) fn validate_sources(&self) -> Result<(), Error> {
        for source in self.system.nodes().filter(|n| n.is_source()) {
            self.ensure_no_inflows(source)?;
        }
        Ok(())
    }

    /// Validates that sinks don't have any outflows.
    pub(super) fn validate_sinks(&self) -> Result<(), Error> {
        for sink in self.system.nodes().filter(|n| n.is_sink()) {
            self.ensure_no_outflows(sink)?;
        }
        Ok(())
    }

    /// Validates that transformers and storages have at least one inflow and
    /// one outflow.
    ///
    /// Unconnected ones are only accepted when the config allows them.
    pub(super) fn validate_converters(&self) -> Result<(), Error> {
        for node in self
            .system
            .nodes()
            .filter(|n| n.is_transformer() || n.is_storage())
        {
            if self.system.config.allow_unconnected_nodes && self.is_unconnected(node)? {
                continue;
            }
            self.ensure_passes_through(node)?;
        }
        Ok(())
    }

    /// Validates that connectors are connected only to busses.
    pub(super) fn validate_connectors(&self) -> Result<(), Error> {
        for connector in self.system.nodes().filter(|n| n.is_connector()) {
            self.ensure_on_neighbors(connector, |n| n.is_bus(), "Busses")?;
        }
        Ok(())
    }

    fn is_unconnected(&self, node: &N) -> Result<bool, Error> {
        Ok(self.system.predecessors(node.label())?.next().is_none()
            && self.system.successors(node.label())?.next().is_none())
    }
}
