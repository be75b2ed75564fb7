// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Building comparative tables from the result sets of all toolkits.

use std::rc::Rc;

use super::tables::{GlobalTable, ScalarTable, TimeSeriesTable, ToolkitColumns};
use super::ComparisonSession;
use crate::{
    ComponentIdentity, GlobalMetric, Presence, ScalarQuantity, SeriesQuantity, TimeIndex,
    TimeSeries, ToolkitResultSet,
};

/// Joins the series of all toolkits for one identity into a comparative
/// table.
///
/// Toolkit columns follow the order of `result_sets`.  Sub-components are
/// ordered by first appearance, and a present toolkit that lacks a
/// sub-component gets an all-missing column for it.
pub fn build_series_table(
    identity: &ComponentIdentity,
    quantity: SeriesQuantity,
    result_sets: &[ToolkitResultSet],
    time_index: &TimeIndex,
) -> TimeSeriesTable {
    let per_toolkit = result_sets
        .iter()
        .map(|r| (r.label(), r.series_columns(quantity, identity)))
        .collect::<Vec<_>>();

    let mut sub_components: Vec<String> = vec![];
    for (_, columns) in &per_toolkit {
        if let Presence::Present(columns) = columns {
            for (label, _) in columns {
                if !sub_components.contains(label) {
                    sub_components.push(label.clone());
                }
            }
        }
    }

    let columns = per_toolkit
        .into_iter()
        .map(|(toolkit, columns)| ToolkitColumns {
            toolkit: toolkit.to_string(),
            series: columns.map(|columns| {
                sub_components
                    .iter()
                    .map(|sub| {
                        columns
                            .iter()
                            .find(|(label, _)| label == sub)
                            .map_or_else(
                                || TimeSeries::missing(time_index.len()),
                                |(_, series)| TimeSeries::clone(series),
                            )
                    })
                    .collect()
            }),
        })
        .collect();

    TimeSeriesTable {
        identity: identity.clone(),
        quantity,
        time_index: *time_index,
        sub_components,
        columns,
    }
}

/// Joins the values of all toolkits for one identity into a comparative
/// table.
///
/// The table is empty if the quantity doesn't apply to the kind of identity.
pub fn build_scalar_table(
    identity: &ComponentIdentity,
    quantity: ScalarQuantity,
    result_sets: &[ToolkitResultSet],
) -> ScalarTable {
    let applies = quantity.is_edge_quantity() == identity.is_edge();
    ScalarTable {
        identity: identity.clone(),
        quantity,
        rows: result_sets
            .iter()
            .map(|r| {
                let value = if applies {
                    r.scalar(quantity, identity)
                } else {
                    Presence::Absent
                };
                (r.label().to_string(), value)
            })
            .collect(),
    }
}

pub fn build_global_table(result_sets: &[ToolkitResultSet]) -> GlobalTable {
    GlobalTable {
        toolkits: result_sets.iter().map(|r| r.label().to_string()).collect(),
        rows: GlobalMetric::ALL
            .iter()
            .map(|&metric| {
                (
                    metric,
                    result_sets.iter().map(|r| r.global().get(metric)).collect(),
                )
            })
            .collect(),
    }
}

/// Comparative table retrieval.
impl ComparisonSession {
    /// Returns the comparative table of a time-indexed quantity for the given
    /// identity.
    ///
    /// The table is built on first request and shared afterwards.  If no
    /// toolkit reports the identity, the table is empty.
    pub fn series_table(
        &self,
        quantity: SeriesQuantity,
        identity: &ComponentIdentity,
    ) -> Rc<TimeSeriesTable> {
        let key = (quantity, identity.clone());
        if let Some(table) = self.series_tables.borrow().get(&key) {
            return Rc::clone(table);
        }

        tracing::debug!("Building {quantity} table for {identity}.");
        let table = Rc::new(build_series_table(
            identity,
            quantity,
            &self.result_sets,
            &self.time_index,
        ));
        self.series_tables
            .borrow_mut()
            .insert(key, Rc::clone(&table));
        table
    }

    /// Returns the comparative table of a scalar quantity for the given
    /// identity.
    pub fn scalar_table(
        &self,
        quantity: ScalarQuantity,
        identity: &ComponentIdentity,
    ) -> Rc<ScalarTable> {
        let key = (quantity, identity.clone());
        if let Some(table) = self.scalar_tables.borrow().get(&key) {
            return Rc::clone(table);
        }

        tracing::debug!("Building {quantity} table for {identity}.");
        let table = Rc::new(build_scalar_table(identity, quantity, &self.result_sets));
        self.scalar_tables
            .borrow_mut()
            .insert(key, Rc::clone(&table));
        table
    }

    /// Returns the global results of all toolkits.
    pub fn global_table(&self) -> GlobalTable {
        build_global_table(&self.result_sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::test_utils::{hourly_index, new_session, TestToolkit};
    use crate::system::test_utils::EnergySystemBuilder;
    use crate::{ComparisonConfig, Error, GlobalResults, Reference};

    fn power_flow(values: [f64; 2]) -> TestToolkit {
        TestToolkit::new(hourly_index(2))
            .with_flow("Power Source", "Power Grid", values)
            .with_flow("Power Grid", "Power Demand", values)
    }

    fn supply() -> ComponentIdentity {
        ComponentIdentity::edge("Power Source", "Power Grid")
    }

    #[test]
    fn test_series_table_is_cached() -> Result<(), Error> {
        let session = new_session(
            &EnergySystemBuilder::power_system(),
            ComparisonConfig::new(["oemof", "pypsa"]),
            &[("oemof", power_flow([1.0, 2.0])), ("pypsa", power_flow([2.0, 2.0]))],
        )?;

        let first = session.series_table(SeriesQuantity::Flow, &supply());
        let second = session.series_table(SeriesQuantity::Flow, &supply());
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first, second);

        let load = session.series_table(SeriesQuantity::Load, &ComponentIdentity::node("Power Grid"));
        assert!(!Rc::ptr_eq(&first, &load));

        let first = session.scalar_table(ScalarQuantity::NetEnergyFlow, &supply());
        let second = session.scalar_table(ScalarQuantity::NetEnergyFlow, &supply());
        assert!(Rc::ptr_eq(&first, &second));

        Ok(())
    }

    #[test]
    fn test_load_table_columns() -> Result<(), Error> {
        // pypsa eliminates the demand edge, fine reports it first.
        let oemof = power_flow([1.0, 2.0]);
        let pypsa = TestToolkit::new(hourly_index(2)).with_flow("Power Source", "Power Grid", [1.0, 1.0]);
        let fine = TestToolkit::new(hourly_index(2))
            .with_flow("Power Grid", "Power Demand", [3.0, 3.0])
            .with_flow("Power Source", "Power Grid", [3.0, 3.0]);
        let session = new_session(
            &EnergySystemBuilder::power_system(),
            ComparisonConfig::new(["pypsa", "fine", "oemof"]),
            &[("oemof", oemof), ("pypsa", pypsa), ("fine", fine)],
        )?;

        let table = session.series_table(SeriesQuantity::Load, &ComponentIdentity::node("Power Grid"));
        assert_eq!(
            table.sub_components(),
            &["Power Source -> Power Grid", "Power Grid -> Power Demand"]
        );
        assert!(table
            .columns()
            .iter()
            .map(|c| c.toolkit())
            .eq(["pypsa", "fine", "oemof"]));

        let Presence::Present(pypsa) = table.toolkit("pypsa") else {
            panic!("pypsa columns missing");
        };
        assert_eq!(pypsa[0].values(), &[Some(-1.0), Some(-1.0)]);
        assert!(pypsa[1].is_all_missing());

        assert_eq!(
            table.column_labels(),
            vec![
                "pypsa/Power Source -> Power Grid",
                "pypsa/Power Grid -> Power Demand",
                "fine/Power Source -> Power Grid",
                "fine/Power Grid -> Power Demand",
                "oemof/Power Source -> Power Grid",
                "oemof/Power Grid -> Power Demand",
            ]
        );
        let rows = table.rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1].1,
            vec![Some(-1.0), None, Some(-3.0), Some(3.0), Some(-2.0), Some(2.0)]
        );
        assert!(table
            .to_string()
            .starts_with("timestamp,pypsa/Power Source -> Power Grid,"));

        Ok(())
    }

    #[test]
    fn test_average_excludes_absent_toolkits() -> Result<(), Error> {
        let x = TestToolkit::new(hourly_index(2));
        let y = power_flow([10.0, 10.0]);
        let z = power_flow([20.0, 20.0]);
        let session = new_session(
            &EnergySystemBuilder::power_system(),
            ComparisonConfig::new(["x", "y", "z"]),
            &[("x", x), ("y", y), ("z", z)],
        )?;

        let table = session.series_table(SeriesQuantity::Flow, &supply());
        assert!(table.toolkit("x").is_absent());
        assert!(table.present_toolkits().eq(["y", "z"]));
        assert_eq!(table.average().series()[0].values(), &[Some(15.0), Some(15.0)]);
        assert_eq!(
            table.reference(&Reference::Average),
            Some(table.average())
        );
        assert_eq!(table.reference(&Reference::toolkit("x")), None);
        assert_eq!(
            table
                .reference(&Reference::toolkit("z"))
                .map(|r| r.flattened()),
            Some(vec![Some(20.0), Some(20.0)])
        );

        let scalars = session.scalar_table(ScalarQuantity::NetEnergyFlow, &supply());
        assert_eq!(scalars.value("x"), Presence::Absent);
        assert_eq!(scalars.value("y"), Presence::Present(20.0));
        assert_eq!(scalars.average(), Some(30.0));
        assert_eq!(
            scalars.to_string(),
            "toolkit,net energy flow\nx,\ny,20\nz,40\n"
        );

        Ok(())
    }

    #[test]
    fn test_empty_table() -> Result<(), Error> {
        let session = new_session(
            &EnergySystemBuilder::power_system(),
            ComparisonConfig::new(["oemof", "pypsa"]),
            &[
                ("oemof", TestToolkit::new(hourly_index(3))),
                ("pypsa", TestToolkit::new(hourly_index(3))),
            ],
        )?;

        let table = session.series_table(SeriesQuantity::Flow, &supply());
        assert!(table.is_empty());
        assert!(table.sub_components().is_empty());
        assert_eq!(table.len(), 3);
        assert!(table.average().is_degenerate());

        let soc = session.series_table(SeriesQuantity::Soc, &ComponentIdentity::node("Battery"));
        assert!(soc.is_empty());

        let scalars = session.scalar_table(ScalarQuantity::InstalledCapacity, &ComponentIdentity::node("Power Grid"));
        assert!(scalars.is_empty());
        assert_eq!(scalars.average(), None);

        // Node quantities don't apply to edges, and edge quantities not to
        // nodes.
        let scalars = session.scalar_table(ScalarQuantity::InstalledCapacity, &supply());
        assert!(scalars.is_empty());
        assert_eq!(scalars.rows().len(), 2);
        let scalars = session.scalar_table(
            ScalarQuantity::NetEnergyFlow,
            &ComponentIdentity::node("Power Grid"),
        );
        assert!(scalars.is_empty());

        Ok(())
    }

    #[test]
    fn test_global_table() -> Result<(), Error> {
        let oemof = power_flow([1.0, 1.0]).with_global(GlobalResults {
            costs: Some(100.0),
            time: Some(2.5),
            ..Default::default()
        });
        let pypsa = power_flow([1.0, 1.0]).with_global(GlobalResults {
            costs: Some(110.0),
            emissions: Some(f64::NAN),
            ..Default::default()
        });
        let session = new_session(
            &EnergySystemBuilder::power_system(),
            ComparisonConfig::new(["oemof", "pypsa"]),
            &[("oemof", oemof), ("pypsa", pypsa)],
        )?;

        let table = session.global_table();
        assert_eq!(table.toolkits(), &["oemof", "pypsa"]);
        assert_eq!(table.rows().len(), GlobalMetric::ALL.len());
        assert_eq!(table.value(GlobalMetric::Costs, "pypsa"), Some(110.0));
        assert_eq!(table.value(GlobalMetric::Time, "pypsa"), None);
        assert_eq!(table.value(GlobalMetric::Emissions, "pypsa"), None);
        assert_eq!(table.value(GlobalMetric::Time, "oemof"), Some(2.5));
        assert_eq!(table.value(GlobalMetric::Time, "fine"), None);
        assert!(table.to_string().contains("\ncosts,100,110\n"));

        Ok(())
    }
}
