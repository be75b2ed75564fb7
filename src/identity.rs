// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Canonical identities of the nodes and edges that are compared across
//! toolkits.

use crate::NamingConfig;

/// A stable key for one node or one directed edge of an energy system.
///
/// Identities hold canonical names, so that the renderings of "the same"
/// system by different toolkits can be matched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ComponentIdentity {
    Node(String),
    Edge { source: String, destination: String },
}

impl ComponentIdentity {
    /// Creates the identity of the node with the given name.
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node(name.into())
    }

    /// Creates the identity of the edge from `source` to `destination`.
    pub fn edge(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::Edge {
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge { .. })
    }

    /// Returns the node name, if this is a node identity.
    pub fn node_name(&self) -> Option<&str> {
        match self {
            Self::Node(name) => Some(name),
            Self::Edge { .. } => None,
        }
    }

    /// Returns the `(source, destination)` names, if this is an edge identity.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match self {
            Self::Node(_) => None,
            Self::Edge {
                source,
                destination,
            } => Some((source, destination)),
        }
    }
}

impl std::fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(name) => write!(f, "{name}"),
            Self::Edge {
                source,
                destination,
            } => write!(f, "{source} -> {destination}"),
        }
    }
}

impl NamingConfig {
    /// Returns the canonical spelling of the given name.
    pub fn canonicalize(&self, raw: &str) -> String {
        let name = if self.normalize_whitespace {
            raw.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            raw.to_string()
        };
        match self.aliases.get(&name) {
            Some(canonical) => canonical.clone(),
            None => name,
        }
    }

    /// Returns the canonical identity of the edge between the given names.
    pub fn canonical_edge(&self, source: &str, destination: &str) -> ComponentIdentity {
        ComponentIdentity::edge(self.canonicalize(source), self.canonicalize(destination))
    }
}
