//! Port for region persistence adapters.

use async_trait::async_trait;

use crate::domain::id::RegionId;
use crate::domain::region::{Region, RegionChanges};
use crate::domain::spatial::SpatialFilter;

/// Persistence errors raised by region repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionPersistenceError {
    /// Repository connection could not be established.
    #[error("region repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("region repository query failed: {message}")]
    Query { message: String },
}

impl RegionPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for region storage and spatial lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionRepository: Send + Sync {
    /// Insert a freshly created region.
    async fn insert(&self, region: &Region) -> Result<(), RegionPersistenceError>;

    /// Fetch a region by identifier.
    async fn find_by_id(&self, id: &RegionId) -> Result<Option<Region>, RegionPersistenceError>;

    /// Fetch every region.
    async fn list(&self) -> Result<Vec<Region>, RegionPersistenceError>;

    /// Apply a partial update, returning the updated region when it exists.
    async fn update(
        &self,
        id: &RegionId,
        changes: RegionChanges,
    ) -> Result<Option<Region>, RegionPersistenceError>;

    /// Delete a region, returning the removed document when it existed.
    async fn delete(&self, id: &RegionId) -> Result<Option<Region>, RegionPersistenceError>;

    /// Fetch regions matching a spatial filter.
    ///
    /// Distance-bounded filters return results ordered nearest first.
    async fn find_matching(
        &self,
        filter: &SpatialFilter,
    ) -> Result<Vec<Region>, RegionPersistenceError>;
}
