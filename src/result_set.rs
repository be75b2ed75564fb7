// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Normalization of the results of one toolkit into tables keyed by
//! canonical identities.

use std::collections::HashMap;

use crate::{
    ComponentIdentity, Error, GlobalResults, NamingConfig, Presence, SystemLayout, TimeIndex,
    TimeSeries, ToolkitResults,
};

/// Time-indexed quantities that can be compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SeriesQuantity {
    /// Inflows (negative) and outflows (positive) of a node, one column per
    /// edge.
    Load,
    /// The flow along an edge.
    Flow,
    /// The state of charge of a storage.
    Soc,
}

impl std::fmt::Display for SeriesQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesQuantity::Load => write!(f, "load"),
            SeriesQuantity::Flow => write!(f, "flow"),
            SeriesQuantity::Soc => write!(f, "soc"),
        }
    }
}

/// Scalar quantities that can be compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScalarQuantity {
    InstalledCapacity,
    OriginalCapacity,
    ExpansionCost,
    /// Mean flow through a node relative to its installed capacity.
    CharacteristicValue,
    SpecificCost,
    SpecificEmission,
    /// Sum of an edge's flow over the whole time index.
    NetEnergyFlow,
    TotalCost,
    TotalEmission,
}

impl ScalarQuantity {
    /// Returns true if the quantity describes edges rather than nodes.
    pub fn is_edge_quantity(&self) -> bool {
        matches!(
            self,
            Self::SpecificCost
                | Self::SpecificEmission
                | Self::NetEnergyFlow
                | Self::TotalCost
                | Self::TotalEmission
        )
    }
}

impl std::fmt::Display for ScalarQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarQuantity::InstalledCapacity => write!(f, "installed capacity"),
            ScalarQuantity::OriginalCapacity => write!(f, "original capacity"),
            ScalarQuantity::ExpansionCost => write!(f, "expansion cost"),
            ScalarQuantity::CharacteristicValue => write!(f, "characteristic value"),
            ScalarQuantity::SpecificCost => write!(f, "specific cost"),
            ScalarQuantity::SpecificEmission => write!(f, "specific emission"),
            ScalarQuantity::NetEnergyFlow => write!(f, "net energy flow"),
            ScalarQuantity::TotalCost => write!(f, "total cost"),
            ScalarQuantity::TotalEmission => write!(f, "total emission"),
        }
    }
}

/// The load of one node: one column per connected edge, inflows negative and
/// outflows positive.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadTable {
    node: String,
    columns: Vec<(ComponentIdentity, TimeSeries)>,
}

impl LoadTable {
    /// Returns the columns of the table, in the order the toolkit reported
    /// them.
    pub fn columns(&self) -> &[(ComponentIdentity, TimeSeries)] {
        &self.columns
    }

    /// Returns the column of the given edge.
    pub fn column(&self, edge: &ComponentIdentity) -> Option<&TimeSeries> {
        self.columns
            .iter()
            .find(|(id, _)| id == edge)
            .map(|(_, series)| series)
    }

    fn is_outflow(&self, edge: &ComponentIdentity) -> bool {
        edge.endpoints()
            .is_some_and(|(source, _)| source == self.node)
    }

    /// Returns the total flow through the node per timestep: the sum of all
    /// outflows, or the sum of all inflows for nodes without outflows.
    pub fn throughput(&self, len: usize) -> Option<TimeSeries> {
        let outflows = self
            .columns
            .iter()
            .filter(|(id, _)| self.is_outflow(id))
            .collect::<Vec<_>>();
        let (columns, sign) = if outflows.is_empty() {
            (self.columns.iter().collect::<Vec<_>>(), -1.0)
        } else {
            (outflows, 1.0)
        };
        if columns.is_empty() {
            return None;
        }

        let mut total = TimeSeries::missing(len);
        for (_, series) in columns {
            total.add_present(series);
        }
        Some(TimeSeries::from_options(
            total.values().iter().map(|v| v.map(|v| sign * v)),
        ))
    }
}

/// All normalized results of one toolkit.
///
/// Created once per toolkit and comparison session, immutable afterwards.
#[derive(Clone, Debug)]
pub struct ToolkitResultSet {
    label: String,
    time_index: TimeIndex,
    loads: HashMap<ComponentIdentity, Presence<LoadTable>>,
    flows: HashMap<ComponentIdentity, Presence<TimeSeries>>,
    soc: HashMap<ComponentIdentity, Presence<TimeSeries>>,
    scalars: HashMap<(ScalarQuantity, ComponentIdentity), Presence<f64>>,
    global: GlobalResults,
}

impl ToolkitResultSet {
    /// Queries `results` for every identity of `layout` and stores the
    /// normalized answers.
    ///
    /// Returns an error if a reported series doesn't match the toolkit's time
    /// index.
    pub fn from_results(
        label: impl Into<String>,
        layout: &SystemLayout,
        results: &dyn ToolkitResults,
        naming: &NamingConfig,
    ) -> Result<Self, Error> {
        let label = label.into();
        let time_index = results.time_index();
        let check_len = |what: &dyn std::fmt::Display, len: usize| {
            if len != time_index.len() {
                return Err(Error::invalid_results(format!(
                    "Toolkit {label} reported {len} values for {what}, expected {}.",
                    time_index.len()
                )));
            }
            Ok(())
        };

        let mut result_set = Self {
            label: label.clone(),
            time_index,
            loads: HashMap::new(),
            flows: HashMap::new(),
            soc: HashMap::new(),
            scalars: HashMap::new(),
            global: results.global_results(),
        };

        for node in layout.nodes() {
            let Some(name) = node.node_name() else {
                continue;
            };

            let load = match results.node_load(name) {
                Some(edge_loads) => {
                    let mut columns: Vec<(ComponentIdentity, TimeSeries)> = vec![];
                    for edge_load in edge_loads {
                        let edge = naming.canonical_edge(&edge_load.source, &edge_load.destination);
                        check_len(&edge, edge_load.values.len())?;
                        if columns.iter().any(|(id, _)| *id == edge) {
                            tracing::warn!("Toolkit {label} reported edge {edge} twice; ignoring.");
                            continue;
                        }
                        let series = TimeSeries::from_values(edge_load.values);
                        let is_outflow = match edge.endpoints() {
                            Some((source, _)) if source == name => Some(true),
                            Some((_, destination)) if destination == name => Some(false),
                            _ => None,
                        };
                        match is_outflow {
                            Some(true) => columns.push((edge, series)),
                            Some(false) => columns.push((edge, series.negated())),
                            None => tracing::warn!(
                                "Toolkit {label} reported edge {edge} for unconnected node {name}; ignoring."
                            ),
                        }
                    }
                    Presence::Present(LoadTable {
                        node: name.to_string(),
                        columns,
                    })
                }
                None => {
                    tracing::debug!("Toolkit {label} has no load for node {name}.");
                    Presence::Absent
                }
            };

            let installed = Presence::from_scalar(results.node_installed_capacity(name));
            let characteristic = match (&load, installed) {
                (Presence::Present(table), Presence::Present(capacity)) if capacity != 0.0 => table
                    .throughput(time_index.len())
                    .and_then(|series| series.mean())
                    .map(|mean| mean / capacity)
                    .into(),
                _ => Presence::Absent,
            };

            let scalars = [
                (ScalarQuantity::InstalledCapacity, installed),
                (
                    ScalarQuantity::OriginalCapacity,
                    Presence::from_scalar(results.node_original_capacity(name)),
                ),
                (
                    ScalarQuantity::ExpansionCost,
                    Presence::from_scalar(results.node_expansion_cost(name)),
                ),
                (ScalarQuantity::CharacteristicValue, characteristic),
            ];
            for (quantity, value) in scalars {
                result_set.scalars.insert((quantity, node.clone()), value);
            }
            result_set.loads.insert(node.clone(), load);
        }

        for storage in layout.storages() {
            let Some(name) = storage.node_name() else {
                continue;
            };
            let soc = match results.node_soc(name) {
                Some(values) => {
                    check_len(storage, values.len())?;
                    Presence::Present(TimeSeries::from_values(values))
                }
                None => Presence::Absent,
            };
            result_set.soc.insert(storage.clone(), soc);
        }

        for edge in layout.edges() {
            let Some((source, destination)) = edge.endpoints() else {
                continue;
            };

            let flow = result_set.find_flow(edge, source, destination);
            let net_energy_flow: Presence<f64> =
                flow.as_ref().present().and_then(TimeSeries::sum).into();
            let specific_cost = Presence::from_scalar(results.edge_specific_cost(source, destination));
            let specific_emission =
                Presence::from_scalar(results.edge_specific_emission(source, destination));

            let scalars = [
                (ScalarQuantity::SpecificCost, specific_cost),
                (ScalarQuantity::SpecificEmission, specific_emission),
                (ScalarQuantity::NetEnergyFlow, net_energy_flow),
                (
                    ScalarQuantity::TotalCost,
                    net_energy_flow.and_then(|net| specific_cost.map(|cost| net * cost)),
                ),
                (
                    ScalarQuantity::TotalEmission,
                    net_energy_flow.and_then(|net| specific_emission.map(|em| net * em)),
                ),
            ];
            for (quantity, value) in scalars {
                result_set.scalars.insert((quantity, edge.clone()), value);
            }
            result_set.flows.insert(edge.clone(), flow);
        }

        Ok(result_set)
    }

    /// Finds the flow along an edge in the load table of its source node, or
    /// failing that, in the load table of its destination node.
    fn find_flow(
        &self,
        edge: &ComponentIdentity,
        source: &str,
        destination: &str,
    ) -> Presence<TimeSeries> {
        let lookup = |node: &str| {
            self.loads
                .get(&ComponentIdentity::node(node))
                .and_then(|load| load.as_ref().present())
                .and_then(|table| table.column(edge))
        };

        if let Some(outflow) = lookup(source) {
            return Presence::Present(outflow.clone());
        }
        if let Some(inflow) = lookup(destination) {
            return Presence::Present(inflow.negated());
        }
        Presence::Absent
    }

    /// Returns the label of the toolkit.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    /// Returns the load table of the given node.
    pub fn load(&self, node: &ComponentIdentity) -> Presence<&LoadTable> {
        self.loads
            .get(node)
            .map_or(Presence::Absent, Presence::as_ref)
    }

    /// Returns the flow along the given edge.
    pub fn flow(&self, edge: &ComponentIdentity) -> Presence<&TimeSeries> {
        self.flows
            .get(edge)
            .map_or(Presence::Absent, Presence::as_ref)
    }

    /// Returns the state of charge of the given storage.
    pub fn soc(&self, storage: &ComponentIdentity) -> Presence<&TimeSeries> {
        self.soc
            .get(storage)
            .map_or(Presence::Absent, Presence::as_ref)
    }

    /// Returns the value of a scalar quantity for the given identity.
    pub fn scalar(&self, quantity: ScalarQuantity, identity: &ComponentIdentity) -> Presence<f64> {
        self.scalars
            .get(&(quantity, identity.clone()))
            .copied()
            .unwrap_or(Presence::Absent)
    }

    pub fn global(&self) -> &GlobalResults {
        &self.global
    }

    /// Returns the labelled columns of a time-indexed quantity.
    ///
    /// Load columns are labelled by edge; flow and state of charge have a
    /// single column labelled by the quantity.
    pub fn series_columns(
        &self,
        quantity: SeriesQuantity,
        identity: &ComponentIdentity,
    ) -> Presence<Vec<(String, &TimeSeries)>> {
        match quantity {
            SeriesQuantity::Load => self.load(identity).map(|table| {
                table
                    .columns()
                    .iter()
                    .map(|(edge, series)| (edge.to_string(), series))
                    .collect()
            }),
            SeriesQuantity::Flow => self
                .flow(identity)
                .map(|series| vec![(quantity.to_string(), series)]),
            SeriesQuantity::Soc => self
                .soc(identity)
                .map(|series| vec![(quantity.to_string(), series)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::test_utils::{hourly_index, TestToolkit};
    use crate::system::test_utils::EnergySystemBuilder;

    fn layout() -> SystemLayout {
        EnergySystemBuilder::chp_system()
            .build(None)
            .and_then(|s| s.layout(&NamingConfig::default()))
            .unwrap()
    }

    fn toolkit() -> TestToolkit {
        TestToolkit::new(hourly_index(3))
            .with_flow("Gas Source", "Gas Grid", [10.0, 10.0, 10.0])
            .with_flow("Gas Grid", "CHP", [10.0, 10.0, 10.0])
            .with_flow("CHP", "Powerline", [4.0, 4.0, f64::NAN])
            .with_flow("CHP", "Heat Grid", [5.0, 5.0, 5.0])
            .with_flow("Powerline", "Power Demand", [4.0, 4.0, 4.0])
            .with_installed_capacity("CHP", 10.0)
            .with_original_capacity("CHP", 8.0)
            .with_edge_cost("Gas Source", "Gas Grid", 0.5)
            .with_edge_emission("Gas Source", "Gas Grid", 0.2)
            .with_soc("Battery", [0.0, 1.0, 2.0])
    }

    #[test]
    fn test_loads() -> Result<(), Error> {
        let results = ToolkitResultSet::from_results(
            "oemof",
            &layout(),
            &toolkit(),
            &NamingConfig::default(),
        )?;
        assert_eq!(results.label(), "oemof");

        let Presence::Present(chp) = results.load(&ComponentIdentity::node("CHP")) else {
            panic!("CHP load missing");
        };
        assert_eq!(
            chp.column(&ComponentIdentity::edge("Gas Grid", "CHP"))
                .map(|s| s.values().to_vec()),
            Some(vec![Some(-10.0), Some(-10.0), Some(-10.0)])
        );
        assert_eq!(
            chp.column(&ComponentIdentity::edge("CHP", "Powerline"))
                .map(|s| s.values().to_vec()),
            Some(vec![Some(4.0), Some(4.0), None])
        );

        // The battery has no edges in this toolkit, but it was queried.
        assert!(results.load(&ComponentIdentity::node("Battery")).is_present());
        assert!(results.load(&ComponentIdentity::node("Heat Pump")).is_absent());

        Ok(())
    }

    #[test]
    fn test_flows_and_edge_scalars() -> Result<(), Error> {
        let results = ToolkitResultSet::from_results(
            "oemof",
            &layout(),
            &toolkit(),
            &NamingConfig::default(),
        )?;

        let gas = ComponentIdentity::edge("Gas Source", "Gas Grid");
        assert_eq!(
            results.flow(&gas).present().map(|s| s.values().to_vec()),
            Some(vec![Some(10.0); 3])
        );
        assert_eq!(
            results.scalar(ScalarQuantity::NetEnergyFlow, &gas),
            Presence::Present(30.0)
        );
        assert_eq!(
            results.scalar(ScalarQuantity::TotalCost, &gas),
            Presence::Present(15.0)
        );
        assert_eq!(
            results.scalar(ScalarQuantity::TotalEmission, &gas),
            Presence::Present(6.0)
        );

        let charge = ComponentIdentity::edge("Powerline", "Battery");
        assert!(results.flow(&charge).is_absent());
        assert!(results
            .scalar(ScalarQuantity::NetEnergyFlow, &charge)
            .is_absent());

        let power = ComponentIdentity::edge("CHP", "Powerline");
        assert_eq!(
            results.scalar(ScalarQuantity::NetEnergyFlow, &power),
            Presence::Present(8.0)
        );
        assert!(results.scalar(ScalarQuantity::TotalCost, &power).is_absent());

        Ok(())
    }

    #[test]
    fn test_node_scalars_and_soc() -> Result<(), Error> {
        let results = ToolkitResultSet::from_results(
            "oemof",
            &layout(),
            &toolkit(),
            &NamingConfig::default(),
        )?;

        let chp = ComponentIdentity::node("CHP");
        assert_eq!(
            results.scalar(ScalarQuantity::InstalledCapacity, &chp),
            Presence::Present(10.0)
        );
        assert_eq!(
            results.scalar(ScalarQuantity::OriginalCapacity, &chp),
            Presence::Present(8.0)
        );
        assert!(results.scalar(ScalarQuantity::ExpansionCost, &chp).is_absent());
        // Outflows are 9, 9 and 5 (the missing power value is skipped).
        let Presence::Present(characteristic) =
            results.scalar(ScalarQuantity::CharacteristicValue, &chp)
        else {
            panic!("characteristic value missing");
        };
        assert!((characteristic - 23.0 / 30.0).abs() < 1e-12);

        assert_eq!(
            results
                .soc(&ComponentIdentity::node("Battery"))
                .present()
                .map(|s| s.values().to_vec()),
            Some(vec![Some(0.0), Some(1.0), Some(2.0)])
        );

        Ok(())
    }

    #[test]
    fn test_absent_nodes() -> Result<(), Error> {
        let toolkit = toolkit()
            .without_node("Battery")
            .with_expansion_cost("CHP", 12.0)
            .with_installed_capacity("Power Demand", 8.0);
        let results =
            ToolkitResultSet::from_results("fine", &layout(), &toolkit, &NamingConfig::default())?;

        let battery = ComponentIdentity::node("Battery");
        assert!(results.load(&battery).is_absent());
        assert!(results
            .series_columns(SeriesQuantity::Load, &battery)
            .is_absent());
        assert_eq!(
            results.scalar(ScalarQuantity::ExpansionCost, &ComponentIdentity::node("CHP")),
            Presence::Present(12.0)
        );

        // Sinks have no outflows, so their inflows count.
        assert_eq!(
            results.scalar(
                ScalarQuantity::CharacteristicValue,
                &ComponentIdentity::node("Power Demand")
            ),
            Presence::Present(0.5)
        );

        Ok(())
    }

    #[test]
    fn test_scalar_quantity_kinds() {
        assert!(ScalarQuantity::NetEnergyFlow.is_edge_quantity());
        assert!(ScalarQuantity::SpecificCost.is_edge_quantity());
        assert!(!ScalarQuantity::InstalledCapacity.is_edge_quantity());
        assert!(!ScalarQuantity::CharacteristicValue.is_edge_quantity());
    }

    #[test]
    fn test_length_mismatch() {
        let toolkit = toolkit().with_flow("Heat Grid", "Heat Demand", [1.0, 2.0]);
        assert!(ToolkitResultSet::from_results(
            "pypsa",
            &layout(),
            &toolkit,
            &NamingConfig::default()
        )
        .is_err_and(|e| e
            == Error::invalid_results(
                "Toolkit pypsa reported 2 values for Heat Grid -> Heat Demand, expected 3."
            )));
    }

    #[test]
    fn test_canonical_edge_names() -> Result<(), Error> {
        let mut naming = NamingConfig {
            normalize_whitespace: true,
            ..Default::default()
        };
        naming
            .aliases
            .insert("Gas Bus".to_string(), "Gas Grid".to_string());
        let toolkit = TestToolkit::new(hourly_index(2))
            .with_naming(naming.clone())
            .with_flow("Gas  Source", "Gas Bus", [1.0, 2.0]);

        let results = ToolkitResultSet::from_results("fine", &layout(), &toolkit, &naming)?;
        assert!(results
            .flow(&ComponentIdentity::edge("Gas Source", "Gas Grid"))
            .is_present());

        Ok(())
    }
}
