use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Open-Meteo geocoding search endpoint.
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Nominatim reverse geocoding endpoint.
pub const REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Number of candidates requested per search.
pub const SEARCH_COUNT: usize = 8;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in kilometers (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}, {:.3}", self.latitude, self.longitude)
    }
}

/// A geocoding candidate.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// First-level administrative region (state, province)
    #[serde(rename = "admin1", default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub population: Option<u64>,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// "Hayden, Idaho, United States (47.766, -116.787)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.short_label(), self.coordinates())
    }

    /// Name, region and country, skipping whatever is missing.
    pub fn short_label(&self) -> String {
        [Some(&self.name), self.region.as_ref(), self.country.as_ref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of a geocoding search response.
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Option<Vec<Place>>,
}

impl GeocodingResponse {
    pub fn into_places(self) -> Vec<Place> {
        self.results.unwrap_or_default()
    }
}

/// Filter and order geocoding candidates.
///
/// Only places in `allow_regions` are kept (case-insensitive; an empty
/// list keeps everything). With `near` set, the closest place comes first;
/// otherwise the most populous. Equal keys keep the service's order.
pub fn rank_places(
    places: Vec<Place>,
    allow_regions: &[String],
    near: Option<&Coordinates>,
) -> Vec<Place> {
    let mut ranked: Vec<Place> = places
        .into_iter()
        .filter(|p| {
            allow_regions.is_empty()
                || p.region
                    .as_deref()
                    .is_some_and(|r| allow_regions.iter().any(|a| a.eq_ignore_ascii_case(r)))
        })
        .collect();
    match near {
        Some(origin) => ranked.sort_by(|a, b| {
            let da = origin.distance_km(&a.coordinates());
            let db = origin.distance_km(&b.coordinates());
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        }),
        None => ranked.sort_by(|a, b| match (a.population, b.population) {
            (Some(pa), Some(pb)) => pb.cmp(&pa),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
    ranked
}

/// Address parts from a reverse geocoding response.
#[derive(Debug, Default, PartialEq, Clone, Deserialize)]
pub struct ReverseAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Body of a reverse geocoding response.
#[derive(Debug, Default, PartialEq, Clone, Deserialize)]
pub struct ReversePlace {
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<ReverseAddress>,
    /// Set by the service when nothing is found at the coordinates
    #[serde(default)]
    pub error: Option<String>,
}

impl ReversePlace {
    /// "Spirit Lake, Idaho, United States", or the service's display name
    /// when no locality is present. `None` if the service found nothing.
    pub fn label(&self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        if let Some(address) = &self.address {
            let locality = address
                .city
                .as_ref()
                .or(address.town.as_ref())
                .or(address.village.as_ref())
                .or(address.hamlet.as_ref())
                .or(address.county.as_ref());
            if let Some(locality) = locality {
                let parts: Vec<&str> = [
                    Some(locality),
                    address.state.as_ref(),
                    address.country.as_ref(),
                ]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
                return Some(parts.join(", "));
            }
        }
        self.display_name.clone()
    }
}
