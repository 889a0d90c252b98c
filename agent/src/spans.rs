//! [`tracing::Span`] constructors for agent operations.
//!
//! Consistent span names and field sets make a single offset easy to follow
//! across the footprint and burn logs.

use offset_types::{CreditVolume, EnergyConsumption, Region};
use tracing::{info_span, Span};

/// Span covering one full offset, from region lookup to submission.
///
/// `volume` is recorded once the footprint has been assessed, so it is empty
/// on offsets that fail before a volume exists.
pub fn offset_span(region: &Region, consumption: EnergyConsumption) -> Span {
    info_span!(
        "offset",
        region = %region,
        kwh = consumption.kwh(),
        volume = tracing::field::Empty
    )
}

/// Span covering a single credit burn.
pub fn burn_span(volume: CreditVolume) -> Span {
    info_span!("burn", volume = volume.get())
}
