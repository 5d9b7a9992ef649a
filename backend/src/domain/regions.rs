//! Region orchestration service and reference consistency.
//!
//! Region create and delete are best-effort dual writes: the region document
//! and the owner's denormalised region set are written concurrently with no
//! cross-collection transaction and no ordering guarantee between the two
//! completions. A half-applied pair is logged with both ids so drift is
//! detectable; the delete path's defensive scrub is the repair mechanism.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::error;

use crate::domain::error::Error;
use crate::domain::export;
use crate::domain::id::RegionId;
use crate::domain::ports::{
    RegionPersistenceError, RegionRepository, RegionsCommand, RegionsQuery, UserPersistenceError,
    UserRepository,
};
use crate::domain::region::{NewRegion, Region, RegionChanges};
use crate::domain::spatial::{NearbyQuery, SpatialFilter};

/// Region service implementing the driving ports.
#[derive(Clone)]
pub struct RegionService<R, U> {
    regions: Arc<R>,
    users: Arc<U>,
}

impl<R, U> RegionService<R, U> {
    /// Create a service over the region and user repositories.
    pub fn new(regions: Arc<R>, users: Arc<U>) -> Self {
        Self { regions, users }
    }
}

impl<R, U> RegionService<R, U>
where
    R: RegionRepository,
    U: UserRepository,
{
    fn map_region_error(error: RegionPersistenceError) -> Error {
        match error {
            RegionPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("region repository unavailable: {message}"))
            }
            RegionPersistenceError::Query { message } => {
                Error::internal(format!("region repository error: {message}"))
            }
        }
    }

    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn missing() -> Error {
        Error::not_found("region not found")
    }
}

#[async_trait]
impl<R, U> RegionsCommand for RegionService<R, U>
where
    R: RegionRepository,
    U: UserRepository,
{
    async fn create(&self, new_region: NewRegion) -> Result<Region, Error> {
        let owner_exists = self
            .users
            .exists(&new_region.owner)
            .await
            .map_err(Self::map_user_error)?;
        if !owner_exists {
            return Err(Error::not_found("user not found"));
        }

        let now = Utc::now();
        let region = Region {
            id: RegionId::random(),
            name: new_region.name,
            coordinates: new_region.coordinates,
            owner: new_region.owner,
            created_at: now,
            updated_at: now,
        };

        let (inserted, attached) = tokio::join!(
            self.regions.insert(&region),
            self.users.attach_region(&region.owner, &region.id),
        );
        match (&inserted, &attached) {
            (Ok(()), Err(err)) => error!(
                region = %region.id,
                owner = %region.owner,
                error = %err,
                "region inserted but owner set update failed",
            ),
            (Err(err), Ok(())) => error!(
                region = %region.id,
                owner = %region.owner,
                error = %err,
                "owner set updated but region insert failed",
            ),
            _ => {}
        }
        inserted.map_err(Self::map_region_error)?;
        attached.map_err(Self::map_user_error)?;
        Ok(region)
    }

    async fn update(&self, id: &RegionId, changes: RegionChanges) -> Result<Region, Error> {
        self.regions
            .update(id, changes)
            .await
            .map_err(Self::map_region_error)?
            .ok_or_else(Self::missing)
    }

    async fn delete(&self, id: &RegionId) -> Result<Region, Error> {
        // The scrub runs regardless of whether the document still exists, so
        // a stale back-reference is repaired even when the region is gone.
        let (deleted, detached) = tokio::join!(
            self.regions.delete(id),
            self.users.detach_region_from_all(id),
        );
        match (&deleted, &detached) {
            (Ok(Some(_)), Err(err)) => error!(
                region = %id,
                error = %err,
                "region deleted but owner set scrub failed",
            ),
            (Err(err), Ok(_)) => error!(
                region = %id,
                error = %err,
                "owner sets scrubbed but region delete failed",
            ),
            _ => {}
        }
        let deleted = deleted.map_err(Self::map_region_error)?;
        detached.map_err(Self::map_user_error)?;
        deleted.ok_or_else(Self::missing)
    }
}

#[async_trait]
impl<R, U> RegionsQuery for RegionService<R, U>
where
    R: RegionRepository,
    U: UserRepository,
{
    async fn list(&self) -> Result<Vec<Region>, Error> {
        self.regions.list().await.map_err(Self::map_region_error)
    }

    async fn fetch(&self, id: &RegionId) -> Result<Region, Error> {
        self.regions
            .find_by_id(id)
            .await
            .map_err(Self::map_region_error)?
            .ok_or_else(Self::missing)
    }

    async fn search(&self, query: NearbyQuery) -> Result<Vec<Region>, Error> {
        let filter = SpatialFilter::build(query)?;
        self.regions
            .find_matching(&filter)
            .await
            .map_err(Self::map_region_error)
    }

    async fn export_csv(&self) -> Result<Vec<u8>, Error> {
        let regions = self.regions.list().await.map_err(Self::map_region_error)?;
        export::regions_to_csv(&regions)
    }
}
