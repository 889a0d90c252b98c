//! Region emission-factor lookup.
//!
//! The calculator depends only on the [`RegionLookup`] trait. The SQLite
//! backend reads the `factors_by_countries` table; tests use the in-memory
//! lookup from `offset-nullables`.

pub mod error;
pub mod region;
pub mod sqlite;

pub use error::StoreError;
pub use region::RegionLookup;
pub use sqlite::SqliteRegionLookup;
