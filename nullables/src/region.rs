//! Nullable region lookup: an in-memory emission factor table.

use async_trait::async_trait;
use offset_store::{RegionLookup, StoreError};
use offset_types::Region;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// An in-memory region table that counts its lookups.
pub struct NullRegionLookup {
    factors: Mutex<HashMap<String, f64>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    lookups: AtomicUsize,
}

impl NullRegionLookup {
    pub fn new() -> Self {
        Self {
            factors: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Builder form of [`set_region`](Self::set_region).
    pub fn with_region(self, region: &str, coefficient: f64) -> Self {
        self.set_region(region, coefficient);
        self
    }

    pub fn set_region(&self, region: &str, coefficient: f64) {
        self.factors
            .lock()
            .unwrap()
            .insert(region.to_string(), coefficient);
    }

    /// Make every subsequent lookup fail with a backend error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Make every subsequent lookup sleep for `delay` before answering.
    pub fn delay_by(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of lookups served so far, including failed ones.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for NullRegionLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegionLookup for NullRegionLookup {
    async fn coefficient_for(&self, region: &Region) -> Result<f64, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(StoreError::Backend(message));
        }
        self.factors
            .lock()
            .unwrap()
            .get(region.as_str())
            .copied()
            .ok_or_else(|| StoreError::NotFound(region.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn region_keys_are_exact() {
        let lookup = NullRegionLookup::new().with_region("DE", 0.4);
        assert_eq!(lookup.coefficient_for(&Region::from("DE")).await.unwrap(), 0.4);
        assert!(matches!(
            lookup.coefficient_for(&Region::from("de")).await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(lookup.lookups(), 2);
    }

    #[tokio::test]
    async fn delayed_lookup_still_answers() {
        let lookup = NullRegionLookup::new().with_region("FR", 0.05);
        lookup.delay_by(Duration::from_millis(20));
        assert_eq!(lookup.coefficient_for(&Region::from("FR")).await.unwrap(), 0.05);
    }
}
