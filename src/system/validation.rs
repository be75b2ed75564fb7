// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating an [`EnergySystem`].

mod invariant_checks;
mod validate_nodes;

use crate::{Edge, EnergySystem, Error, Node};

pub(crate) struct EnergySystemValidator<'a, N, E>
where
    N: Node,
    E: Edge,
{
    system: &'a EnergySystem<N, E>,
}

impl<N, E> EnergySystem<N, E>
where
    N: Node,
    E: Edge,
{
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let validator = EnergySystemValidator { system: self };

        validator.validate_connectedness()?;
        validator.validate_sources()?;
        validator.validate_sinks()?;
        validator.validate_converters()?;
        validator.validate_connectors()?;

        Ok(())
    }
}
