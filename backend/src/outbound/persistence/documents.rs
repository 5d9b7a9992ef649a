//! BSON document shapes for the users and regions collections.
//!
//! `_id` carries the entity's UUID string and coordinates persist as the
//! legacy two-element `[longitude, latitude]` array the 2dsphere index
//! accepts.

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, Region, RegionId, User, UserId};

/// Stored user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    pub regions: Vec<RegionId>,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDocument {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            address: value.address,
            coordinates: value.coordinates,
            regions: value.regions,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<UserDocument> for User {
    fn from(value: UserDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            address: value.address,
            coordinates: value.coordinates,
            regions: value.regions,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Stored region document; the owner persists under the `user` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDocument {
    #[serde(rename = "_id")]
    pub id: RegionId,
    pub name: String,
    pub coordinates: GeoPoint,
    #[serde(rename = "user")]
    pub owner: UserId,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<Region> for RegionDocument {
    fn from(value: Region) -> Self {
        Self {
            id: value.id,
            name: value.name,
            coordinates: value.coordinates,
            owner: value.owner,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<RegionDocument> for Region {
    fn from(value: RegionDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            coordinates: value.coordinates,
            owner: value.owner,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Render a point as the stored `[longitude, latitude]` BSON array.
pub(super) fn point_bson(point: &GeoPoint) -> Bson {
    Bson::Array(vec![
        Bson::Double(point.longitude()),
        Bson::Double(point.latitude()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn user() -> User {
        User {
            id: UserId::random(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            address: Some("221B Baker St".to_owned()),
            coordinates: Some(GeoPoint::new(-0.15, 51.52).expect("valid point")),
            regions: vec![RegionId::random()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn user_documents_store_uuid_under_id_and_bson_datetimes() {
        let user = user();
        let document =
            bson::to_document(&UserDocument::from(user.clone())).expect("encode user document");

        assert_eq!(document.get_str("_id").expect("_id"), user.id.as_ref());
        assert!(document.get_datetime("createdAt").is_ok());
        let coordinates = document.get_array("coordinates").expect("coordinates");
        assert_eq!(
            coordinates,
            &vec![Bson::Double(-0.15), Bson::Double(51.52)]
        );
    }

    #[test]
    fn region_documents_store_the_owner_under_the_user_key() {
        let region = Region {
            id: RegionId::random(),
            name: "R1".to_owned(),
            coordinates: GeoPoint::new(20.0, 10.0).expect("valid point"),
            owner: UserId::random(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let document =
            bson::to_document(&RegionDocument::from(region.clone())).expect("encode region");

        assert_eq!(document.get_str("user").expect("user"), region.owner.as_ref());
        assert!(document.get("owner").is_none());
    }

    #[test]
    fn documents_round_trip_through_bson() {
        let user = user();
        let encoded = bson::to_document(&UserDocument::from(user.clone())).expect("encode");
        let decoded: UserDocument = bson::from_document(encoded).expect("decode");

        let round_tripped = User::from(decoded);
        assert_eq!(round_tripped.id, user.id);
        assert_eq!(round_tripped.coordinates, user.coordinates);
        assert_eq!(round_tripped.regions, user.regions);
        // BSON datetimes carry millisecond precision.
        assert_eq!(
            round_tripped.created_at.timestamp_millis(),
            user.created_at.timestamp_millis()
        );
    }
}
