// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`ComparisonSession`] instances and accessing their
//! inputs.

use std::cell::RefCell;
use std::collections::HashMap;

use super::ComparisonSession;
use crate::{
    ComparisonConfig, ComponentIdentity, Edge, EnergySystem, Error, Node, SeriesQuantity,
    SystemLayout, TimeIndex, ToolkitResultSet, ToolkitResults,
};

impl ComparisonSession {
    /// Creates a new session comparing the given toolkit results for
    /// `system`.
    ///
    /// `results` pairs each toolkit label from `config.models` with the
    /// toolkit's results.
    ///
    /// Returns an error if the config is invalid, if results are missing or
    /// unexpected for a label, if the toolkits don't share one time index, or
    /// if a toolkit reports series of the wrong length.
    pub fn try_new<'a, N, E>(
        config: ComparisonConfig,
        system: &EnergySystem<N, E>,
        results: impl IntoIterator<Item = (&'a str, &'a dyn ToolkitResults)>,
    ) -> Result<Self, Error>
    where
        N: Node,
        E: Edge,
    {
        config.validate()?;
        let layout = system.layout(&config.naming)?;

        let mut by_label: HashMap<&str, &dyn ToolkitResults> = HashMap::new();
        for (label, toolkit) in results {
            if !config.models.iter().any(|m| m == label) {
                return Err(Error::invalid_config(format!(
                    "Results given for unknown toolkit {label}."
                )));
            }
            if by_label.insert(label, toolkit).is_some() {
                return Err(Error::invalid_config(format!(
                    "Results given twice for toolkit {label}."
                )));
            }
        }

        let mut time_index: Option<(&str, TimeIndex)> = None;
        let mut result_sets = Vec::with_capacity(config.models.len());
        for model in &config.models {
            let toolkit = by_label.get(model.as_str()).ok_or_else(|| {
                Error::invalid_config(format!("No results given for toolkit {model}."))
            })?;

            let index = toolkit.time_index();
            match time_index {
                Some((first, expected)) if expected != index => {
                    return Err(Error::invalid_results(format!(
                        "Toolkit {model} uses a different time index than toolkit {first}."
                    )));
                }
                Some(_) => {}
                None => time_index = Some((model.as_str(), index)),
            }

            result_sets.push(ToolkitResultSet::from_results(
                model.as_str(),
                &layout,
                *toolkit,
                &config.naming,
            )?);
        }
        let Some((_, time_index)) = time_index else {
            return Err(Error::invalid_config("No models configured."));
        };

        tracing::info!(
            "Comparing {} toolkits on {} nodes and {} edges over {} timesteps, reference: {}.",
            result_sets.len(),
            layout.nodes().count(),
            layout.edges().len(),
            time_index.len(),
            config.reference,
        );

        Ok(Self {
            config,
            layout,
            time_index,
            result_sets,
            series_tables: RefCell::new(HashMap::new()),
            scalar_tables: RefCell::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Returns the canonical identities of the compared system.
    pub fn layout(&self) -> &SystemLayout {
        &self.layout
    }

    /// Returns the time index shared by all toolkits.
    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    /// Returns the labels of the compared toolkits, in model order.
    pub fn toolkits(&self) -> &[String] {
        &self.config.models
    }

    /// Returns the normalized results of the given toolkit.
    pub fn result_set(&self, label: &str) -> Result<&ToolkitResultSet, Error> {
        self.result_sets
            .iter()
            .find(|r| r.label() == label)
            .ok_or_else(|| Error::component_not_found(format!("Toolkit {label} not found.")))
    }

    /// Returns the identities the given quantity applies to: all nodes for
    /// loads, all edges for flows and all storages for states of charge.
    pub fn identities(&self, quantity: SeriesQuantity) -> Vec<ComponentIdentity> {
        match quantity {
            SeriesQuantity::Load => self.layout.nodes().cloned().collect(),
            SeriesQuantity::Flow => self.layout.edges().to_vec(),
            SeriesQuantity::Soc => self.layout.storages().cloned().collect(),
        }
    }
}
