//! The offset workflow: footprint first, then the burn.

use offset_footprint::{compute_footprint, FootprintCalculator};
use offset_store::RegionLookup;
use offset_types::{CreditVolume, EmissionFactor, EnergyConsumption, FootprintMass, Region};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, Instrument, Span};

use crate::burner::{validate_volume, BurnTransaction, CreditBurner};
use crate::pricing::estimated_cost;
use crate::spans::offset_span;
use crate::OffsetError;

/// Everything known about an offset before any chain request is made.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FootprintAssessment {
    pub region: Region,
    pub consumption: EnergyConsumption,
    pub emission_factor: EmissionFactor,
    pub footprint: FootprintMass,
    pub volume: CreditVolume,
    pub estimated_cost_usd: f64,
}

/// A completed offset: the assessment plus the submitted burn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OffsetReceipt {
    #[serde(flatten)]
    pub assessment: FootprintAssessment,
    pub transaction: BurnTransaction,
}

/// The chain-free half of an offset: resolve the factor under a timeout,
/// compute the footprint and validate the volume.
pub struct Assessor<L> {
    calculator: FootprintCalculator<L>,
    lookup_timeout: Duration,
}

impl<L: RegionLookup> Assessor<L> {
    pub fn new(lookup: L, lookup_timeout: Duration) -> Self {
        Self {
            calculator: FootprintCalculator::new(lookup),
            lookup_timeout,
        }
    }

    pub fn calculator(&self) -> &FootprintCalculator<L> {
        &self.calculator
    }

    /// An expired region lookup is a transport error.
    pub async fn assess(
        &self,
        consumption: EnergyConsumption,
        region: &Region,
    ) -> Result<FootprintAssessment, OffsetError> {
        let emission_factor = tokio::time::timeout(
            self.lookup_timeout,
            self.calculator.resolve_emission_factor(region),
        )
        .await
        .map_err(|_| {
            OffsetError::Transport(format!(
                "region lookup: timed out after {:?}",
                self.lookup_timeout
            ))
        })??;

        let footprint = compute_footprint(consumption, emission_factor);
        let volume = validate_volume(footprint)?;
        info!(footprint = footprint.value(), volume = volume.get(), "footprint assessed");
        Ok(FootprintAssessment {
            region: region.clone(),
            consumption,
            emission_factor,
            footprint,
            volume,
            estimated_cost_usd: estimated_cost(volume),
        })
    }
}

pub struct OffsetAgent<L> {
    assessor: Assessor<L>,
    burner: CreditBurner,
}

impl<L: RegionLookup> OffsetAgent<L> {
    pub fn new(lookup: L, burner: CreditBurner, lookup_timeout: Duration) -> Self {
        Self {
            assessor: Assessor::new(lookup, lookup_timeout),
            burner,
        }
    }

    pub fn calculator(&self) -> &FootprintCalculator<L> {
        self.assessor.calculator()
    }

    pub fn burner(&self) -> &CreditBurner {
        &self.burner
    }

    /// Resolve the factor, compute the footprint and validate the volume.
    /// Makes no chain requests.
    pub async fn assess(
        &self,
        consumption: EnergyConsumption,
        region: &Region,
    ) -> Result<FootprintAssessment, OffsetError> {
        self.assessor.assess(consumption, region).await
    }

    /// Offset `consumption` in `region`: burn credits equal to the truncated
    /// footprint and return the volume with the burn transaction.
    pub async fn offset_footprint(
        &self,
        consumption: EnergyConsumption,
        region: &Region,
    ) -> Result<(CreditVolume, BurnTransaction), OffsetError> {
        let receipt = self.offset_with_receipt(consumption, region).await?;
        Ok((receipt.assessment.volume, receipt.transaction))
    }

    /// Like [`offset_footprint`](Self::offset_footprint), returning the full
    /// receipt.
    pub async fn offset_with_receipt(
        &self,
        consumption: EnergyConsumption,
        region: &Region,
    ) -> Result<OffsetReceipt, OffsetError> {
        async {
            let assessment = self.assess(consumption, region).await?;
            Span::current().record("volume", assessment.volume.get());
            let transaction = self.burner.burn(assessment.volume).await?;
            Ok::<_, OffsetError>(OffsetReceipt {
                assessment,
                transaction,
            })
        }
        .instrument(offset_span(region, consumption))
        .await
    }
}
