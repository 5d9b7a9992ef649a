//! Address/coordinate reconciliation.
//!
//! A user supplies exactly one of address or coordinates; the other side is
//! derived through the geocoding port. The upstream answers latitude-first,
//! so this module also owns the reordering into longitude-first storage
//! order.

use std::sync::Arc;

use tracing::debug;

use crate::domain::error::Error;
use crate::domain::geo::GeoPoint;
use crate::domain::ports::{Geocoder, GeocoderError, LatLng};

/// Author-supplied side of the address/coordinates pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Address given; coordinates will be derived.
    Address(String),
    /// Coordinates given; the display address will be derived.
    Coordinates(GeoPoint),
}

impl LocationInput {
    /// Classify creation input, requiring exactly one populated field.
    pub fn for_create(
        address: Option<String>,
        coordinates: Option<GeoPoint>,
    ) -> Result<Self, Error> {
        match (address, coordinates) {
            (Some(_), Some(_)) => Err(Error::invalid_input("fill only address or coordinates")),
            (None, None) => Err(Error::invalid_input(
                "either address or coordinates is required",
            )),
            (Some(address), None) => Ok(Self::Address(address)),
            (None, Some(point)) => Ok(Self::Coordinates(point)),
        }
    }

    /// Classify update input; `Ok(None)` means neither geo field changes and
    /// no lookup runs.
    pub fn for_update(
        address: Option<String>,
        coordinates: Option<GeoPoint>,
    ) -> Result<Option<Self>, Error> {
        match (address, coordinates) {
            (Some(_), Some(_)) => Err(Error::invalid_input("fill only address or coordinates")),
            (None, None) => Ok(None),
            (Some(address), None) => Ok(Some(Self::Address(address))),
            (None, Some(point)) => Ok(Some(Self::Coordinates(point))),
        }
    }
}

/// Outcome of reconciliation: both sides populated where derivable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLocation {
    pub address: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

/// Derives the missing geo field through a [`Geocoder`].
#[derive(Clone)]
pub struct Reconciler<G> {
    geocoder: Arc<G>,
}

impl<G> Reconciler<G> {
    /// Create a reconciler over the given geocoder.
    pub fn new(geocoder: Arc<G>) -> Self {
        Self { geocoder }
    }
}

impl<G> Reconciler<G>
where
    G: Geocoder,
{
    /// Populate the derived side of the supplied location.
    ///
    /// A forward lookup matching nothing leaves `coordinates` unset and the
    /// address stored as given; geocoder failures propagate as
    /// [`crate::domain::ErrorCode::UpstreamUnavailable`].
    pub async fn resolve(&self, input: LocationInput) -> Result<ResolvedLocation, Error> {
        match input {
            LocationInput::Address(address) => {
                let matched = self
                    .geocoder
                    .forward(&address)
                    .await
                    .map_err(map_geocoder_error)?;
                let coordinates = match matched {
                    Some(pair) => Some(storage_point(pair)?),
                    None => {
                        debug!(%address, "forward geocode matched nothing; storing address only");
                        None
                    }
                };
                Ok(ResolvedLocation {
                    address: Some(address),
                    coordinates,
                })
            }
            LocationInput::Coordinates(point) => {
                let address = self
                    .geocoder
                    .reverse(&point)
                    .await
                    .map_err(map_geocoder_error)?;
                Ok(ResolvedLocation {
                    address: Some(address),
                    coordinates: Some(point),
                })
            }
        }
    }
}

/// Reorder an upstream latitude-first pair into storage order.
fn storage_point(pair: LatLng) -> Result<GeoPoint, Error> {
    GeoPoint::new(pair.longitude, pair.latitude).map_err(|err| {
        Error::upstream_unavailable(format!("geocoder returned invalid coordinates: {err}"))
    })
}

fn map_geocoder_error(error: GeocoderError) -> Error {
    Error::upstream_unavailable(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockGeocoder;
    use crate::domain::ErrorCode;

    fn reconciler(geocoder: MockGeocoder) -> Reconciler<MockGeocoder> {
        Reconciler::new(Arc::new(geocoder))
    }

    #[tokio::test]
    async fn address_input_stores_coordinates_longitude_first() {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_forward()
            .withf(|address| address == "221B Baker St")
            .times(1)
            .return_once(|_| {
                Ok(Some(LatLng {
                    latitude: 51.52,
                    longitude: -0.15,
                }))
            });

        let resolved = reconciler(geocoder)
            .resolve(LocationInput::Address("221B Baker St".to_owned()))
            .await
            .expect("reconciliation succeeds");

        assert_eq!(resolved.address.as_deref(), Some("221B Baker St"));
        let point = resolved.coordinates.expect("coordinates derived");
        assert_eq!(
            serde_json::to_value(point).expect("serialise point"),
            serde_json::json!([-0.15, 51.52])
        );
    }

    #[tokio::test]
    async fn unmatched_address_keeps_address_and_leaves_coordinates_unset() {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_forward().times(1).return_once(|_| Ok(None));

        let resolved = reconciler(geocoder)
            .resolve(LocationInput::Address("Atlantis".to_owned()))
            .await
            .expect("no-match is non-fatal");

        assert_eq!(resolved.address.as_deref(), Some("Atlantis"));
        assert!(resolved.coordinates.is_none());
    }

    #[tokio::test]
    async fn coordinate_input_derives_display_address() {
        let point = GeoPoint::new(-0.15, 51.52).expect("valid point");
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_reverse()
            .withf(move |queried| *queried == point)
            .times(1)
            .return_once(|_| Ok("221B Baker St, London".to_owned()));

        let resolved = reconciler(geocoder)
            .resolve(LocationInput::Coordinates(point))
            .await
            .expect("reconciliation succeeds");

        assert_eq!(resolved.address.as_deref(), Some("221B Baker St, London"));
        assert_eq!(resolved.coordinates, Some(point));
    }

    #[tokio::test]
    async fn derived_coordinates_survive_a_reverse_then_forward_round_trip() {
        // Geocoders are not perfectly invertible; the plumbing must still
        // keep the pair within a small epsilon across a full cycle.
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_reverse()
            .times(1)
            .return_once(|_| Ok("near 221B Baker St".to_owned()));
        geocoder.expect_forward().times(1).return_once(|_| {
            Ok(Some(LatLng {
                latitude: 51.520_004,
                longitude: -0.149_998,
            }))
        });

        let original = GeoPoint::new(-0.15, 51.52).expect("valid point");
        let reconciler = reconciler(geocoder);

        let reversed = reconciler
            .resolve(LocationInput::Coordinates(original))
            .await
            .expect("reverse succeeds");
        let address = reversed.address.expect("address derived");

        let forwarded = reconciler
            .resolve(LocationInput::Address(address))
            .await
            .expect("forward succeeds");
        let round_tripped = forwarded.coordinates.expect("coordinates derived");

        assert!((round_tripped.longitude() - original.longitude()).abs() < 1e-4);
        assert!((round_tripped.latitude() - original.latitude()).abs() < 1e-4);
    }

    #[tokio::test]
    async fn transport_failures_surface_as_upstream_unavailable() {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_forward()
            .times(1)
            .return_once(|_| Err(GeocoderError::transport("connection refused")));

        let error = reconciler(geocoder)
            .resolve(LocationInput::Address("anywhere".to_owned()))
            .await
            .expect_err("transport failures are fatal");

        assert_eq!(error.code(), ErrorCode::UpstreamUnavailable);
    }

    #[test]
    fn create_input_requires_exactly_one_side() {
        let point = GeoPoint::new(0.0, 0.0).expect("valid point");

        let both = LocationInput::for_create(Some("a".to_owned()), Some(point));
        assert_eq!(both.expect_err("both sides").code(), ErrorCode::InvalidInput);

        let neither = LocationInput::for_create(None, None);
        assert_eq!(
            neither.expect_err("neither side").code(),
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn update_input_allows_neither_side() {
        assert_eq!(LocationInput::for_update(None, None), Ok(None));

        let point = GeoPoint::new(0.0, 0.0).expect("valid point");
        let both = LocationInput::for_update(Some("a".to_owned()), Some(point));
        assert_eq!(both.expect_err("both sides").code(), ErrorCode::InvalidInput);
    }
}
