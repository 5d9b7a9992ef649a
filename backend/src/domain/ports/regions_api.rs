//! Driving ports for region operations, consumed by inbound adapters.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::id::RegionId;
use crate::domain::region::{NewRegion, Region, RegionChanges};
use crate::domain::spatial::NearbyQuery;

/// Mutating region operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionsCommand: Send + Sync {
    /// Create a region for an existing owner and record the back-reference.
    async fn create(&self, new_region: NewRegion) -> Result<Region, Error>;

    /// Apply a partial update; ownership never changes.
    async fn update(&self, id: &RegionId, changes: RegionChanges) -> Result<Region, Error>;

    /// Delete a region and scrub it from every user's owned set.
    async fn delete(&self, id: &RegionId) -> Result<Region, Error>;
}

/// Read-only region operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionsQuery: Send + Sync {
    /// Fetch every region.
    async fn list(&self) -> Result<Vec<Region>, Error>;

    /// Fetch a region by identifier.
    async fn fetch(&self, id: &RegionId) -> Result<Region, Error>;

    /// Fetch regions near or at a point, optionally excluding one owner.
    async fn search(&self, query: NearbyQuery) -> Result<Vec<Region>, Error>;

    /// Render every region as a CSV document.
    async fn export_csv(&self) -> Result<Vec<u8>, Error>;
}
