// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `NodeCategory` enum, which represents the
//! category of a node in the canonical energy system.

use crate::system_traits::Node;
use std::fmt::Display;

/// Represents the category of a node.
///
/// Toolkit-specific component kinds need to be converted to this type, so
/// that they can be used in the `EnergySystem`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeCategory {
    /// Supplies energy to the system, e.g. a gas source or a PV plant.
    Source,
    /// Removes energy from the system, e.g. a demand.
    Sink,
    /// Converts one or more inflows into one or more outflows, e.g. a CHP.
    Transformer,
    /// Shifts energy in time, e.g. a battery.
    Storage,
    /// Transfers energy between two busses.
    Connector,
    /// Balances all of its inflows and outflows.
    Bus,
}

impl Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeCategory::Source => write!(f, "Source"),
            NodeCategory::Sink => write!(f, "Sink"),
            NodeCategory::Transformer => write!(f, "Transformer"),
            NodeCategory::Storage => write!(f, "Storage"),
            NodeCategory::Connector => write!(f, "Connector"),
            NodeCategory::Bus => write!(f, "Bus"),
        }
    }
}

/// Predicates for checking the category of a `Node`.
pub(crate) trait CategoryPredicates: Node {
    fn is_source(&self) -> bool {
        self.category() == NodeCategory::Source
    }

    fn is_sink(&self) -> bool {
        self.category() == NodeCategory::Sink
    }

    fn is_transformer(&self) -> bool {
        self.category() == NodeCategory::Transformer
    }

    fn is_storage(&self) -> bool {
        self.category() == NodeCategory::Storage
    }

    fn is_connector(&self) -> bool {
        self.category() == NodeCategory::Connector
    }

    fn is_bus(&self) -> bool {
        self.category() == NodeCategory::Bus
    }
}

/// Implement the `CategoryPredicates` trait for all types that implement the
/// `Node` trait.
impl<T: Node> CategoryPredicates for T {}
