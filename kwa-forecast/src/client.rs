use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastRequest, ForecastResponse, FORECAST_URL};
use crate::geocode::{
    Coordinates, GeocodingResponse, Place, ReversePlace, GEOCODING_URL, REVERSE_URL,
};

pub const USER_AGENT: &str = "KayakWindAdvisor/1.0";

/// Timeout applied to every request.
pub const REQUEST_TIMEOUT_SECS: u64 = 20;

/// HTTP client for the geocoding, forecast and reverse geocoding services.
///
/// One attempt per call: a failed request is reported, never retried.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
}

impl WeatherClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(WeatherClient { client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        info!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status from {}: {}", url, status);
            return Err(ForecastError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Geocoding candidates for a place name, in the service's order.
    pub async fn search(&self, name: &str, count: usize) -> Result<Vec<Place>> {
        let query = [
            ("name", name.to_string()),
            ("count", count.to_string()),
            ("language", String::from("en")),
            ("format", String::from("json")),
        ];
        let response: GeocodingResponse = self.get_json(GEOCODING_URL, &query).await?;
        let places = response.into_places();
        info!("{} candidates for {:?}", places.len(), name);
        Ok(places)
    }

    pub async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        self.get_json(FORECAST_URL, &request.query()).await
    }

    pub async fn reverse(&self, coordinates: &Coordinates) -> Result<ReversePlace> {
        let query = [
            ("format", String::from("jsonv2")),
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
            ("zoom", String::from("10")),
        ];
        self.get_json(REVERSE_URL, &query).await
    }
}
