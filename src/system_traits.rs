// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the traits that need to be implemented by the types
//! that represent a node and an edge of the canonical energy system.

use crate::node_category::NodeCategory;

/**
This trait needs to be implemented by the type that represents a node.

Read more about why this is necessary [here][crate#the-node-and-edge-traits].

<details>
<summary>Example implementation for a parsed system model:</summary>

```ignore
impl energy_system_comparison::Node for model::Component {
    fn label(&self) -> &str {
        &self.uid.name
    }

    fn category(&self) -> energy_system_comparison::NodeCategory {
        use energy_system_comparison::NodeCategory;

        match self.kind {
            model::Kind::Source => NodeCategory::Source,
            model::Kind::Sink => NodeCategory::Sink,
            model::Kind::Transformer | model::Kind::Chp => NodeCategory::Transformer,
            model::Kind::Storage => NodeCategory::Storage,
            model::Kind::Connector => NodeCategory::Connector,
            model::Kind::Bus => NodeCategory::Bus,
        }
    }
}
```

</details>
*/
pub trait Node {
    /// Returns the label of the node, unique within an energy system.
    fn label(&self) -> &str;
    /// Returns the category of the node.
    fn category(&self) -> NodeCategory;
}

/**
This trait needs to be implemented by the type that represents a directed
edge between two nodes.

Read more about why this is necessary [here][crate#the-node-and-edge-traits].

<details>
<summary>Example implementation for a parsed system model:</summary>

```ignore
impl energy_system_comparison::Edge for model::Flow {
    fn source(&self) -> &str {
        &self.inflow_from
    }

    fn destination(&self) -> &str {
        &self.outflow_to
    }
}
```

</details>
*/
pub trait Edge {
    /// Returns the label of the node the energy flows out of.
    fn source(&self) -> &str;
    /// Returns the label of the node the energy flows into.
    fn destination(&self) -> &str;
}
