// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Helper methods for checking invariants of an [`EnergySystem`].

use crate::{Edge, Error, Node};

use super::EnergySystemValidator;

impl<N, E> EnergySystemValidator<'_, N, E>
where
    N: Node,
    E: Edge,
{
    /// Checks that the given node doesn't have any outflows.
    pub(super) fn ensure_no_outflows(&self, node: &N) -> Result<(), Error> {
        if let Some(successor) = self.system.successors(node.label())?.next() {
            return Err(Error::invalid_system(format!(
                "{}:{} can't have any outflows. Found {}:{}.",
                node.category(),
                node.label(),
                successor.category(),
                successor.label()
            )));
        }
        Ok(())
    }

    /// Checks that the given node doesn't have any inflows.
    pub(super) fn ensure_no_inflows(&self, node: &N) -> Result<(), Error> {
        if let Some(predecessor) = self.system.predecessors(node.label())?.next() {
            return Err(Error::invalid_system(format!(
                "{}:{} can't have any inflows. Found {}:{}.",
                node.category(),
                node.label(),
                predecessor.category(),
                predecessor.label()
            )));
        }
        Ok(())
    }

    /// Checks that the given node has at least one inflow and one outflow.
    pub(super) fn ensure_passes_through(&self, node: &N) -> Result<(), Error> {
        if self.system.predecessors(node.label())?.next().is_none() {
            return Err(Error::invalid_system(format!(
                "{}:{} must have at least one inflow.",
                node.category(),
                node.label()
            )));
        }
        if self.system.successors(node.label())?.next().is_none() {
            return Err(Error::invalid_system(format!(
                "{}:{} must have at least one outflow.",
                node.category(),
                node.label()
            )));
        }
        Ok(())
    }

    /// Checks that the given predicate holds for all neighbors of the given
    /// node, in both directions.
    pub(super) fn ensure_on_neighbors(
        &self,
        node: &N,
        predicate: impl Fn(&N) -> bool,
        failure_message: &str,
    ) -> Result<(), Error> {
        let neighbors = self
            .system
            .predecessors(node.label())?
            .chain(self.system.successors(node.label())?);
        for neighbor in neighbors {
            if !predicate(neighbor) {
                return Err(Error::invalid_system(format!(
                    "{}:{} can only be connected to {}. Found {}:{}.",
                    node.category(),
                    node.label(),
                    failure_message,
                    neighbor.category(),
                    neighbor.label()
                )));
            }
        }
        Ok(())
    }
}
