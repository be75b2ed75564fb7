// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the canonical energy system whose optimization
//! results are compared across toolkits.

mod creation;
mod layout;
mod retrieval;
mod validation;

pub mod iterators;

#[cfg(test)]
pub(crate) mod test_utils;

pub use layout::SystemLayout;

use crate::{EnergySystemConfig, Edge, Node};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// `Node`s stored in a `DiGraph` instance can be addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any node label, so
/// that nodes in the `DiGraph` can be retrieved from their labels.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// `Edge`s are not stored in the `DiGraph` instance, so we need to store them
/// separately.
///
/// `EdgeMap` can be used to lookup the `Edge` for any pair of source and
/// destination `NodeIndex` values.
pub(crate) type EdgeMap<E> = HashMap<(NodeIndex, NodeIndex), E>;

/// A graph representation of the nodes of an energy system and the directed
/// edges energy flows along.
pub struct EnergySystem<N, E>
where
    N: Node,
    E: Edge,
{
    graph: DiGraph<N, ()>,
    node_indices: NodeIndexMap,
    edges: EdgeMap<E>,
    config: EnergySystemConfig,
}
