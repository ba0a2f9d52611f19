//! MapQuest-style geocoding client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::geocoder::Geocoder;
use crate::domain::bootcamps::Location;

pub struct ReqwestGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReqwestGeocoder {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    locations: Vec<GeocodeLocation>,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    street: Option<String>,
    /// City.
    #[serde(rename = "adminArea5")]
    admin_area5: Option<String>,
    /// State.
    #[serde(rename = "adminArea3")]
    admin_area3: Option<String>,
    /// Country.
    #[serde(rename = "adminArea1")]
    admin_area1: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code: Option<String>,
    #[serde(rename = "latLng")]
    lat_lng: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl Geocoder for ReqwestGeocoder {
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Location>> {
        let mut req = self
            .client
            .get(&self.base_url)
            .query(&[("location", query), ("maxResults", "1")]);
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key.as_str())]);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("geocode request failed: {e}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("geocoder returned status {}", resp.status());
        }
        let body: GeocodeResponse = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("geocode response decode failed: {e}"))?;

        let Some(loc) = body
            .results
            .into_iter()
            .next()
            .and_then(|r| r.locations.into_iter().next())
        else {
            return Ok(None);
        };
        // No coordinates means no usable match
        let Some(lat_lng) = loc.lat_lng else {
            return Ok(None);
        };

        let formatted = {
            let parts: Vec<&str> = [
                loc.street.as_deref(),
                loc.admin_area5.as_deref(),
                loc.admin_area3.as_deref(),
                loc.postal_code.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        };

        Ok(Some(Location {
            formatted_address: formatted,
            street: loc.street,
            city: loc.admin_area5,
            state: loc.admin_area3,
            zipcode: loc.postal_code,
            country: loc.admin_area1,
            lat: Some(lat_lng.lat),
            lng: Some(lat_lng.lng),
        }))
    }
}
