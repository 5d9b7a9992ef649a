//! User entity and user-facing command payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::geo::GeoPoint;
use crate::domain::id::{RegionId, UserId};

/// Application user with a denormalised set of owned region ids.
///
/// ## Invariants
/// - At least one of `address` and `coordinates` is populated after
///   reconciliation; the author supplied exactly one of them.
/// - `regions` behaves as a set: no duplicates, order irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// `[longitude, latitude]`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<GeoPoint>,
    #[schema(value_type = Vec<String>)]
    pub regions: Vec<RegionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Add a region to the owned set. Re-adding an id is a no-op.
    ///
    /// Returns whether the set changed.
    pub fn attach_region(&mut self, region: RegionId) -> bool {
        if self.regions.contains(&region) {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Remove a region from the owned set, returning whether it was present.
    pub fn detach_region(&mut self, region: &RegionId) -> bool {
        let before = self.regions.len();
        self.regions.retain(|owned| owned != region);
        self.regions.len() != before
    }
}

/// Validated creation payload handed from the HTTP layer.
///
/// Exactly one of `address` and `coordinates` must be populated; the
/// reconciler enforces this and derives the other side.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

/// Partial update payload; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<GeoPoint>,
}
