//! Region lookup trait.

use async_trait::async_trait;
use offset_types::Region;

use crate::StoreError;

/// Maps a region identifier to its emission coefficient (gCO2/Wh).
#[async_trait]
pub trait RegionLookup: Send + Sync {
    /// The coefficient stored for exactly this identifier.
    ///
    /// Returns [`StoreError::NotFound`] when there is no entry. Implementations
    /// must not fall back to a default.
    async fn coefficient_for(&self, region: &Region) -> Result<f64, StoreError>;
}
