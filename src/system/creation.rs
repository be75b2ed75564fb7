// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`EnergySystem`] instances from given nodes and
//! edges.

use petgraph::graph::DiGraph;

use crate::{Edge, EnergySystemConfig, Error, Node};

use super::{EdgeMap, EnergySystem, NodeIndexMap};

/// `EnergySystem` instantiation.
impl<N, E> EnergySystem<N, E>
where
    N: Node,
    E: Edge,
{
    /// Creates a new [`EnergySystem`] from the given nodes and edges.
    ///
    /// Returns an error if the system is invalid.
    pub fn try_new<NodeIterator: IntoIterator<Item = N>, EdgeIterator: IntoIterator<Item = E>>(
        nodes: NodeIterator,
        edges: EdgeIterator,
        config: EnergySystemConfig,
    ) -> Result<Self, Error> {
        let (graph, indices) = Self::create_graph(nodes)?;

        let mut system = Self {
            graph,
            node_indices: indices,
            edges: EdgeMap::new(),
            config,
        };
        system.add_edges(edges)?;

        system.validate()?;

        Ok(system)
    }

    fn create_graph(
        nodes: impl IntoIterator<Item = N>,
    ) -> Result<(DiGraph<N, ()>, NodeIndexMap), Error> {
        let mut graph = DiGraph::new();
        let mut indices = NodeIndexMap::new();

        for node in nodes {
            let label = node.label().to_string();

            if label.trim().is_empty() {
                return Err(Error::invalid_component(format!(
                    "Empty label found for a {} node.",
                    node.category()
                )));
            }
            if indices.contains_key(&label) {
                return Err(Error::invalid_system(format!(
                    "Duplicate node label found: {label}"
                )));
            }

            let idx = graph.add_node(node);
            indices.insert(label, idx);
        }

        Ok((graph, indices))
    }

    fn add_edges(&mut self, edges: impl IntoIterator<Item = E>) -> Result<(), Error> {
        for edge in edges {
            let source = edge.source();
            let destination = edge.destination();

            if source == destination {
                return Err(Error::invalid_connection(format!(
                    "Edge:({source}, {destination}) Can't connect a node to itself."
                )));
            }
            for label in [source, destination] {
                if !self.node_indices.contains_key(label) {
                    return Err(Error::invalid_connection(format!(
                        "Edge:({source}, {destination}) Can't find a node with label {label}"
                    )));
                }
            }

            let source_idx = self.node_indices[source];
            let dest_idx = self.node_indices[destination];
            if self.edges.contains_key(&(source_idx, dest_idx)) {
                return Err(Error::invalid_connection(format!(
                    "Edge:({source}, {destination}) Duplicate edge."
                )));
            }
            self.graph.add_edge(source_idx, dest_idx, ());
            self.edges.insert((source_idx, dest_idx), edge);
        }

        Ok(())
    }
}
