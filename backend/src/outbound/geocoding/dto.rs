//! Wire DTOs for the geocode.maps.co API.

use serde::Deserialize;

use crate::domain::ports::{GeocoderError, LatLng};

/// Single match returned by the forward search endpoint.
///
/// Upstream serialises coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResultDto {
    pub lat: String,
    pub lon: String,
}

impl SearchResultDto {
    pub fn into_lat_lng(self) -> Result<LatLng, GeocoderError> {
        let latitude = parse_coordinate(&self.lat, "lat")?;
        let longitude = parse_coordinate(&self.lon, "lon")?;
        Ok(LatLng {
            latitude,
            longitude,
        })
    }
}

/// Response body of the reverse endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ReverseResultDto {
    pub display_name: String,
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, GeocoderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeocoderError::decode(format!("{field} is not a decimal number: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_coordinates_from_a_search_match() {
        let results: Vec<SearchResultDto> = serde_json::from_str(
            r#"[{"lat": "51.5237038", "lon": "-0.1585531", "display_name": "221B Baker St"}]"#,
        )
        .expect("decode search payload");

        let pair = results
            .into_iter()
            .next()
            .expect("one match")
            .into_lat_lng()
            .expect("numeric coordinates");
        assert_eq!(pair.latitude, 51.5237038);
        assert_eq!(pair.longitude, -0.1585531);
    }

    #[test]
    fn empty_search_payload_decodes_to_no_matches() {
        let results: Vec<SearchResultDto> =
            serde_json::from_str("[]").expect("decode empty payload");
        assert!(results.is_empty());
    }

    #[test]
    fn non_numeric_coordinates_are_a_decode_error() {
        let dto = SearchResultDto {
            lat: "fifty-one".to_owned(),
            lon: "-0.15".to_owned(),
        };
        let error = dto.into_lat_lng().expect_err("decode must fail");
        assert!(matches!(error, GeocoderError::Decode { .. }));
    }

    #[test]
    fn reverse_payload_exposes_the_display_name() {
        let dto: ReverseResultDto = serde_json::from_str(
            r#"{"place_id": 1, "display_name": "221B Baker St, London", "lat": "51.52", "lon": "-0.15"}"#,
        )
        .expect("decode reverse payload");
        assert_eq!(dto.display_name, "221B Baker St, London");
    }
}
