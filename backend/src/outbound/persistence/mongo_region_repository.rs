//! MongoDB-backed region repository and spatial filter rendering.

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::documents::{point_bson, RegionDocument};
use super::mongo::{is_connection_error, REGIONS_COLLECTION};
use crate::domain::ports::{RegionPersistenceError, RegionRepository};
use crate::domain::{Region, RegionChanges, RegionId, SpatialFilter, SpatialPredicate};

/// Region repository over the `regions` collection.
#[derive(Clone)]
pub struct MongoRegionRepository {
    collection: Collection<RegionDocument>,
}

impl MongoRegionRepository {
    /// Create a repository bound to the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(REGIONS_COLLECTION),
        }
    }
}

fn map_error(error: mongodb::error::Error) -> RegionPersistenceError {
    if is_connection_error(&error) {
        RegionPersistenceError::connection(error.to_string())
    } else {
        RegionPersistenceError::query(error.to_string())
    }
}

fn by_id(id: &RegionId) -> Document {
    doc! { "_id": id.as_ref() }
}

fn update_document(changes: &RegionChanges) -> Document {
    let mut set = doc! { "updatedAt": DateTime::from_chrono(Utc::now()) };
    if let Some(name) = &changes.name {
        set.insert("name", name.clone());
    }
    if let Some(point) = &changes.coordinates {
        set.insert("coordinates", point_bson(point));
    }
    doc! { "$set": set }
}

/// Render a spatial filter as a MongoDB filter document.
///
/// A distance-bounded filter uses `$near` with `$maxDistance` (which sorts
/// results nearest first and replaces the intersects clause); an unbounded
/// one uses `$geoIntersects` against the query point.
fn filter_document(filter: &SpatialFilter) -> Document {
    let geometry = doc! {
        "type": "Point",
        "coordinates": point_bson(&filter.point),
    };
    let coordinates = match filter.predicate {
        SpatialPredicate::WithinDistance { meters } => doc! {
            "$near": { "$geometry": geometry, "$maxDistance": meters },
        },
        SpatialPredicate::IntersectsPoint => doc! {
            "$geoIntersects": { "$geometry": geometry },
        },
    };

    let mut document = doc! { "coordinates": coordinates };
    if let Some(owner) = &filter.exclude_owner {
        document.insert("user", doc! { "$ne": owner.as_ref() });
    }
    document
}

#[async_trait]
impl RegionRepository for MongoRegionRepository {
    async fn insert(&self, region: &Region) -> Result<(), RegionPersistenceError> {
        self.collection
            .insert_one(RegionDocument::from(region.clone()))
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &RegionId) -> Result<Option<Region>, RegionPersistenceError> {
        self.collection
            .find_one(by_id(id))
            .await
            .map(|found| found.map(Region::from))
            .map_err(map_error)
    }

    async fn list(&self) -> Result<Vec<Region>, RegionPersistenceError> {
        let cursor = self.collection.find(doc! {}).await.map_err(map_error)?;
        let documents: Vec<RegionDocument> = cursor.try_collect().await.map_err(map_error)?;
        Ok(documents.into_iter().map(Region::from).collect())
    }

    async fn update(
        &self,
        id: &RegionId,
        changes: RegionChanges,
    ) -> Result<Option<Region>, RegionPersistenceError> {
        self.collection
            .find_one_and_update(by_id(id), update_document(&changes))
            .return_document(ReturnDocument::After)
            .await
            .map(|updated| updated.map(Region::from))
            .map_err(map_error)
    }

    async fn delete(&self, id: &RegionId) -> Result<Option<Region>, RegionPersistenceError> {
        self.collection
            .find_one_and_delete(by_id(id))
            .await
            .map(|deleted| deleted.map(Region::from))
            .map_err(map_error)
    }

    async fn find_matching(
        &self,
        filter: &SpatialFilter,
    ) -> Result<Vec<Region>, RegionPersistenceError> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .await
            .map_err(map_error)?;
        let documents: Vec<RegionDocument> = cursor.try_collect().await.map_err(map_error)?;
        Ok(documents.into_iter().map(Region::from).collect())
    }
}
