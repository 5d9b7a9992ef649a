//! Spatial query construction for region search.

use crate::domain::error::Error;
use crate::domain::geo::{GeoPoint, GeoValidationError};
use crate::domain::id::UserId;

/// Raw nearby-search input as accepted from the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum distance in meters; absent means point intersection.
    pub distance: Option<f64>,
    /// Owner whose regions are excluded ("regions near me, not mine").
    pub exclude_owner: Option<UserId>,
}

/// Spatial predicate applied to region geometry.
///
/// Distance-bounded search and point intersection are mutually exclusive by
/// construction: a bounded query never also carries an intersects clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialPredicate {
    /// Region geometry intersects the query point.
    IntersectsPoint,
    /// Region lies within the given distance of the query point, nearest
    /// first.
    WithinDistance { meters: f64 },
}

/// Store-agnostic region filter; persistence adapters render it natively.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFilter {
    pub point: GeoPoint,
    pub predicate: SpatialPredicate,
    pub exclude_owner: Option<UserId>,
}

impl SpatialFilter {
    /// Build a filter from raw query input.
    ///
    /// Supplying a distance selects the near predicate; otherwise the filter
    /// degrades to point intersection.
    pub fn build(query: NearbyQuery) -> Result<Self, Error> {
        let point = GeoPoint::new(query.longitude, query.latitude).map_err(map_geo_error)?;
        let predicate = match query.distance {
            Some(meters) => {
                if !meters.is_finite() || meters <= 0.0 {
                    return Err(Error::invalid_input(
                        "distance must be a positive number of meters",
                    ));
                }
                SpatialPredicate::WithinDistance { meters }
            }
            None => SpatialPredicate::IntersectsPoint,
        };
        Ok(Self {
            point,
            predicate,
            exclude_owner: query.exclude_owner,
        })
    }
}

fn map_geo_error(error: GeoValidationError) -> Error {
    Error::invalid_input(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn query() -> NearbyQuery {
        NearbyQuery {
            latitude: 10.0,
            longitude: 20.0,
            distance: None,
            exclude_owner: None,
        }
    }

    #[test]
    fn distance_supersedes_intersects() {
        let filter = SpatialFilter::build(NearbyQuery {
            distance: Some(5000.0),
            ..query()
        })
        .expect("filter builds");

        assert_eq!(
            filter.predicate,
            SpatialPredicate::WithinDistance { meters: 5000.0 }
        );
    }

    #[test]
    fn missing_distance_degrades_to_point_intersection() {
        let filter = SpatialFilter::build(query()).expect("filter builds");
        assert_eq!(filter.predicate, SpatialPredicate::IntersectsPoint);
        assert!(filter.exclude_owner.is_none());
    }

    #[test]
    fn query_point_is_reordered_into_storage_order() {
        let filter = SpatialFilter::build(query()).expect("filter builds");
        assert_eq!(filter.point.longitude(), 20.0);
        assert_eq!(filter.point.latitude(), 10.0);
    }

    #[test]
    fn excluded_owner_is_carried_through() {
        let owner = UserId::random();
        let filter = SpatialFilter::build(NearbyQuery {
            exclude_owner: Some(owner.clone()),
            ..query()
        })
        .expect("filter builds");

        assert_eq!(filter.exclude_owner, Some(owner));
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    fn rejects_non_positive_distances(#[case] distance: f64) {
        let error = SpatialFilter::build(NearbyQuery {
            distance: Some(distance),
            ..query()
        })
        .expect_err("distance must be positive");

        assert_eq!(error.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn rejects_out_of_range_query_points() {
        let error = SpatialFilter::build(NearbyQuery {
            latitude: 95.0,
            ..query()
        })
        .expect_err("latitude out of range");

        assert_eq!(error.code(), ErrorCode::InvalidInput);
    }
}
