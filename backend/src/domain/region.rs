//! Region entity and region-facing command payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::geo::GeoPoint;
use crate::domain::id::{RegionId, UserId};

/// Geofenced region owned by exactly one user.
///
/// ## Invariants
/// - `owner` references an existing user at creation time and never changes
///   afterwards; no update path accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[schema(value_type = String, example = "8c7f24c1-5f2a-4e0e-9f05-0aa27e0d2c6b")]
    pub id: RegionId,
    pub name: String,
    /// `[longitude, latitude]`
    #[schema(value_type = Vec<f64>)]
    pub coordinates: GeoPoint,
    #[serde(rename = "user")]
    #[schema(value_type = String)]
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated creation payload handed from the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegion {
    pub name: String,
    pub coordinates: GeoPoint,
    pub owner: UserId,
}

/// Partial update payload; ownership is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionChanges {
    pub name: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_owner_under_the_user_key() {
        let region = Region {
            id: RegionId::random(),
            name: "R1".to_owned(),
            coordinates: GeoPoint::new(20.0, 10.0).expect("valid point"),
            owner: UserId::random(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&region).expect("serialise region");

        assert_eq!(
            value.get("user").and_then(|v| v.as_str()),
            Some(region.owner.as_ref())
        );
        assert_eq!(value.get("coordinates"), Some(&serde_json::json!([20.0, 10.0])));
    }
}
