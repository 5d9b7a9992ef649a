//! Reqwest-backed geocoding adapter.
//!
//! Owns transport details only: URL construction, request timeout, HTTP
//! status mapping, and JSON decoding into the port's coordinate pair.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{ReverseResultDto, SearchResultDto};
use crate::domain::geo::GeoPoint;
use crate::domain::ports::{Geocoder, GeocoderError, LatLng};

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Geocoding adapter performing GET requests against one endpoint.
pub struct MapsCoGeocoder {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl MapsCoGeocoder {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            base_url,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// An unbounded lookup would block its whole operation, so the timeout
    /// always applies and expiry surfaces as [`GeocoderError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        base_url: Url,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GeocoderError> {
        self.base_url
            .join(path)
            .map_err(|err| GeocoderError::transport(format!("invalid endpoint {path}: {err}")))
    }

    async fn get_json<T>(&self, url: Url, query: &[(&str, String)]) -> Result<T, GeocoderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref())
            .map_err(|err| GeocoderError::decode(format!("invalid geocoder payload: {err}")))
    }
}

#[async_trait]
impl Geocoder for MapsCoGeocoder {
    async fn forward(&self, address: &str) -> Result<Option<LatLng>, GeocoderError> {
        let url = self.endpoint("search")?;
        let results: Vec<SearchResultDto> =
            self.get_json(url, &[("q", address.to_owned())]).await?;
        results
            .into_iter()
            .next()
            .map(SearchResultDto::into_lat_lng)
            .transpose()
    }

    async fn reverse(&self, point: &GeoPoint) -> Result<String, GeocoderError> {
        let url = self.endpoint("reverse")?;
        let result: ReverseResultDto = self
            .get_json(
                url,
                &[
                    ("lat", point.latitude().to_string()),
                    ("lon", point.longitude().to_string()),
                ],
            )
            .await?;
        Ok(result.display_name)
    }
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    if error.is_timeout() {
        GeocoderError::timeout(error.to_string())
    } else {
        GeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocoderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GeocoderError::timeout(message),
        _ => GeocoderError::upstream_status(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
