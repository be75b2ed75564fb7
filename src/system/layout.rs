// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The canonical identities of an [`EnergySystem`], as used by a comparison.

use std::collections::HashSet;

use crate::{ComponentIdentity, Edge, EnergySystem, Error, NamingConfig, Node, NodeCategory};

/// The canonical node and edge identities of an energy system, in insertion
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemLayout {
    nodes: Vec<(ComponentIdentity, NodeCategory)>,
    edges: Vec<ComponentIdentity>,
}

impl SystemLayout {
    /// Returns an iterator over the node identities.
    pub fn nodes(&self) -> impl Iterator<Item = &ComponentIdentity> {
        self.nodes.iter().map(|(id, _)| id)
    }

    /// Returns the edge identities.
    pub fn edges(&self) -> &[ComponentIdentity] {
        &self.edges
    }

    /// Returns an iterator over the identities of all storages.
    pub fn storages(&self) -> impl Iterator<Item = &ComponentIdentity> {
        self.nodes
            .iter()
            .filter(|(_, category)| *category == NodeCategory::Storage)
            .map(|(id, _)| id)
    }

    /// Returns the category of the given node identity.
    pub fn category(&self, identity: &ComponentIdentity) -> Option<NodeCategory> {
        self.nodes
            .iter()
            .find(|(id, _)| id == identity)
            .map(|(_, category)| *category)
    }

    /// Returns true if the identity is a node or an edge of the layout.
    pub fn contains(&self, identity: &ComponentIdentity) -> bool {
        match identity {
            ComponentIdentity::Node(_) => self.category(identity).is_some(),
            ComponentIdentity::Edge { .. } => self.edges.contains(identity),
        }
    }

    /// Returns an iterator over the edges flowing into the given node.
    pub fn inflows<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a ComponentIdentity> {
        self.edges
            .iter()
            .filter(move |e| e.endpoints().is_some_and(|(_, dest)| dest == node))
    }

    /// Returns an iterator over the edges flowing out of the given node.
    pub fn outflows<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a ComponentIdentity> {
        self.edges
            .iter()
            .filter(move |e| e.endpoints().is_some_and(|(source, _)| source == node))
    }
}

impl<N, E> EnergySystem<N, E>
where
    N: Node,
    E: Edge,
{
    /// Returns the canonical identities of all nodes and edges, with names
    /// canonicalized by the given naming rules.
    ///
    /// Returns an error if two nodes end up with the same canonical name.
    pub fn layout(&self, naming: &NamingConfig) -> Result<SystemLayout, Error> {
        let mut seen = HashSet::new();
        let mut nodes = vec![];
        for node in self.nodes() {
            let name = naming.canonicalize(node.label());
            if !seen.insert(name.clone()) {
                return Err(Error::invalid_system(format!(
                    "Node {} has the same canonical name as another node: {name}",
                    node.label()
                )));
            }
            nodes.push((ComponentIdentity::Node(name), node.category()));
        }

        let edges = self
            .edges()
            .map(|e| naming.canonical_edge(e.source(), e.destination()))
            .collect();

        Ok(SystemLayout { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::test_utils::EnergySystemBuilder;

    #[test]
    fn test_layout() -> Result<(), Error> {
        let system = EnergySystemBuilder::chp_system().build(None)?;
        let layout = system.layout(&NamingConfig::default())?;

        assert_eq!(layout.nodes().count(), 8);
        assert_eq!(layout.edges().len(), 8);
        assert!(layout
            .storages()
            .eq(&[ComponentIdentity::node("Battery")]));
        assert_eq!(
            layout.category(&ComponentIdentity::node("CHP")),
            Some(NodeCategory::Transformer)
        );
        assert!(layout.contains(&ComponentIdentity::edge("Gas Grid", "CHP")));
        assert!(!layout.contains(&ComponentIdentity::edge("CHP", "Gas Grid")));

        assert!(layout
            .inflows("Powerline")
            .eq(&[
                ComponentIdentity::edge("CHP", "Powerline"),
                ComponentIdentity::edge("Battery", "Powerline"),
            ]));
        assert!(layout.outflows("CHP").eq(&[
            ComponentIdentity::edge("CHP", "Powerline"),
            ComponentIdentity::edge("CHP", "Heat Grid"),
        ]));

        Ok(())
    }

    #[test]
    fn test_layout_naming() -> Result<(), Error> {
        let system = EnergySystemBuilder::chp_system().build(None)?;
        let mut naming = NamingConfig::default();
        naming
            .aliases
            .insert("Powerline".to_string(), "Power Bus".to_string());

        let layout = system.layout(&naming)?;
        assert!(layout.contains(&ComponentIdentity::node("Power Bus")));
        assert!(layout.contains(&ComponentIdentity::edge("CHP", "Power Bus")));

        naming
            .aliases
            .insert("Heat Grid".to_string(), "Power Bus".to_string());
        assert!(system.layout(&naming).is_err_and(|e| e
            == Error::invalid_system(
                "Node Heat Grid has the same canonical name as another node: Power Bus"
            )));

        Ok(())
    }
}
