use offset_store::StoreError;
use offset_types::Region;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("no emission factor for region {0}")]
    RegionNotFound(Region),

    #[error("emission factor {value} for region {region} is not a positive number")]
    InvalidFactor { region: Region, value: f64 },

    #[error("region lookup failed: {0}")]
    Lookup(StoreError),
}
