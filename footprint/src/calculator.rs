//! Emission factor resolution and footprint arithmetic.

use offset_store::{RegionLookup, StoreError};
use offset_types::{EmissionFactor, EnergyConsumption, FootprintMass, Region};
use tracing::info;

use crate::FootprintError;

/// Resolves emission factors through a region lookup.
pub struct FootprintCalculator<L> {
    lookup: L,
}

impl<L: RegionLookup> FootprintCalculator<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Query the lookup for `region` and validate the coefficient.
    ///
    /// A lookup miss is [`FootprintError::RegionNotFound`]; there is no
    /// default factor.
    pub async fn resolve_emission_factor(
        &self,
        region: &Region,
    ) -> Result<EmissionFactor, FootprintError> {
        let coefficient = self
            .lookup
            .coefficient_for(region)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => FootprintError::RegionNotFound(region.clone()),
                other => FootprintError::Lookup(other),
            })?;

        let factor = EmissionFactor::new(coefficient).ok_or_else(|| FootprintError::InvalidFactor {
            region: region.clone(),
            value: coefficient,
        })?;
        info!(region = %region, coefficient, "emission factor resolved");
        Ok(factor)
    }
}

/// `consumption * factor`. Signs are not checked: a negative consumption gives
/// a negative mass, which volume validation later rejects.
pub fn compute_footprint(consumption: EnergyConsumption, factor: EmissionFactor) -> FootprintMass {
    FootprintMass::new(consumption.kwh() * factor.value())
}
