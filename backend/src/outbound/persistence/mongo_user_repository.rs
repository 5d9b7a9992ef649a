//! MongoDB-backed user repository.

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::documents::{point_bson, UserDocument};
use super::mongo::{is_connection_error, USERS_COLLECTION};
use crate::domain::ports::{UserPatch, UserPersistenceError, UserRepository};
use crate::domain::{RegionId, User, UserId};

/// User repository over the `users` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a repository bound to the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }
}

fn map_error(error: mongodb::error::Error) -> UserPersistenceError {
    if is_connection_error(&error) {
        UserPersistenceError::connection(error.to_string())
    } else {
        UserPersistenceError::query(error.to_string())
    }
}

fn by_id(id: &UserId) -> Document {
    doc! { "_id": id.as_ref() }
}

/// Build the `$set`/`$unset` pair for a partial user update.
///
/// A reconciled location with no coordinates unsets the stored value so a
/// stale derivation never outlives the address it came from.
fn update_document(patch: &UserPatch) -> Document {
    let mut set = doc! { "updatedAt": DateTime::from_chrono(Utc::now()) };
    let mut unset = Document::new();

    if let Some(name) = &patch.name {
        set.insert("name", name.clone());
    }
    if let Some(email) = &patch.email {
        set.insert("email", email.clone());
    }
    if let Some(location) = &patch.location {
        if let Some(address) = &location.address {
            set.insert("address", address.clone());
        }
        match &location.coordinates {
            Some(point) => {
                set.insert("coordinates", point_bson(point));
            }
            None => {
                unset.insert("coordinates", "");
            }
        }
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.collection
            .insert_one(UserDocument::from(user.clone()))
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.collection
            .find_one(by_id(id))
            .await
            .map(|found| found.map(User::from))
            .map_err(map_error)
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self
            .collection
            .find_one(by_id(id))
            .await
            .map_err(map_error)?
            .is_some())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let cursor = self.collection.find(doc! {}).await.map_err(map_error)?;
        let documents: Vec<UserDocument> = cursor.try_collect().await.map_err(map_error)?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn update(
        &self,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.collection
            .find_one_and_update(by_id(id), update_document(&patch))
            .return_document(ReturnDocument::After)
            .await
            .map(|updated| updated.map(User::from))
            .map_err(map_error)
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.collection
            .find_one_and_delete(by_id(id))
            .await
            .map(|deleted| deleted.map(User::from))
            .map_err(map_error)
    }

    async fn attach_region(
        &self,
        id: &UserId,
        region: &RegionId,
    ) -> Result<(), UserPersistenceError> {
        self.collection
            .update_one(
                by_id(id),
                doc! { "$addToSet": { "regions": region.as_ref() } },
            )
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn detach_region_from_all(
        &self,
        region: &RegionId,
    ) -> Result<u64, UserPersistenceError> {
        let result = self
            .collection
            .update_many(
                doc! { "regions": region.as_ref() },
                doc! { "$pull": { "regions": region.as_ref() } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.modified_count)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the pure update-document builder.

    use super::*;
    use crate::domain::{GeoPoint, ResolvedLocation};

    #[test]
    fn patch_without_location_only_touches_named_fields() {
        let update = update_document(&UserPatch {
            name: Some("B".to_owned()),
            email: None,
            location: None,
        });

        let set = update.get_document("$set").expect("$set");
        assert_eq!(set.get_str("name").expect("name"), "B");
        assert!(set.get("email").is_none());
        assert!(set.get("updatedAt").is_some());
        assert!(update.get("$unset").is_none());
    }

    #[test]
    fn reconciled_coordinates_are_stored_longitude_first() {
        let update = update_document(&UserPatch {
            name: None,
            email: None,
            location: Some(ResolvedLocation {
                address: Some("221B Baker St".to_owned()),
                coordinates: Some(GeoPoint::new(-0.15, 51.52).expect("valid point")),
            }),
        });

        let set = update.get_document("$set").expect("$set");
        let coordinates = set.get_array("coordinates").expect("coordinates");
        assert_eq!(
            coordinates,
            &vec![
                mongodb::bson::Bson::Double(-0.15),
                mongodb::bson::Bson::Double(51.52)
            ]
        );
        assert!(update.get("$unset").is_none());
    }

    #[test]
    fn unmatched_addresses_unset_stale_coordinates() {
        let update = update_document(&UserPatch {
            name: None,
            email: None,
            location: Some(ResolvedLocation {
                address: Some("Atlantis".to_owned()),
                coordinates: None,
            }),
        });

        let set = update.get_document("$set").expect("$set");
        assert_eq!(set.get_str("address").expect("address"), "Atlantis");
        let unset = update.get_document("$unset").expect("$unset");
        assert!(unset.get("coordinates").is_some());
    }
}
