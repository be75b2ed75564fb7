// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes and edges from an [`EnergySystem`].

use crate::iterators::{Edges, Neighbors, Nodes};
use crate::{EnergySystem, Edge, Error, Node};

/// `Node` and `Edge` retrieval.
impl<N, E> EnergySystem<N, E>
where
    N: Node,
    E: Edge,
{
    /// Returns the node with the given `label`, if it exists.
    pub fn node(&self, label: &str) -> Result<&N, Error> {
        self.node_indices
            .get(label)
            .map(|i| &self.graph[*i])
            .ok_or_else(|| Error::component_not_found(format!("Node {label} not found.")))
    }

    /// Returns an iterator over the nodes in the system, in insertion order.
    pub fn nodes(&self) -> Nodes<'_, N> {
        Nodes {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns an iterator over the edges in the system, in insertion order.
    pub fn edges(&self) -> Edges<'_, N, E> {
        Edges {
            system: self,
            iter: self.graph.raw_edges().iter(),
        }
    }

    /// Returns an iterator over the nodes that feed energy *into* the node
    /// with the given `label`.
    ///
    /// Returns an error if the given `label` does not exist.
    pub fn predecessors(&self, label: &str) -> Result<Neighbors<'_, N>, Error> {
        self.neighbors(label, petgraph::Direction::Incoming)
    }

    /// Returns an iterator over the nodes that receive energy *from* the node
    /// with the given `label`.
    ///
    /// Returns an error if the given `label` does not exist.
    pub fn successors(&self, label: &str) -> Result<Neighbors<'_, N>, Error> {
        self.neighbors(label, petgraph::Direction::Outgoing)
    }

    fn neighbors(
        &self,
        label: &str,
        direction: petgraph::Direction,
    ) -> Result<Neighbors<'_, N>, Error> {
        self.node_indices
            .get(label)
            .map(|&index| Neighbors {
                graph: &self.graph,
                iter: self.graph.neighbors_directed(index, direction),
            })
            .ok_or_else(|| Error::component_not_found(format!("Node {label} not found.")))
    }
}
