//! One evaluation request: resolve a location, fetch its forecast, rate the
//! chosen date.
//!
//! Any collaborator failure aborts the request with a single error. There
//! is no retry and no partial result.

use chrono::NaiveDate;
use kwa_forecast::client::WeatherClient;
use kwa_forecast::forecast::{DailySummary, ForecastRequest, ForecastResponse};
use kwa_forecast::geocode::{rank_places, Coordinates, Place, ReversePlace, SEARCH_COUNT};
use kwa_forecast::{ForecastError, Result as ForecastResult};
use kwa_rating::{
    rate_day, DayReport, ExposureConfig, HourlyObservation, Modifiers, RatingConfig,
};
use kwa_utils::units::WindUnit;
use log::info;

use crate::session::SessionContext;

/// The external services an evaluation talks to.
#[allow(async_fn_in_trait)]
pub trait Collaborators {
    async fn search(&self, name: &str) -> ForecastResult<Vec<Place>>;
    async fn forecast(&self, request: &ForecastRequest) -> ForecastResult<ForecastResponse>;
    async fn reverse(&self, coordinates: &Coordinates) -> ForecastResult<ReversePlace>;
}

impl Collaborators for WeatherClient {
    async fn search(&self, name: &str) -> ForecastResult<Vec<Place>> {
        WeatherClient::search(self, name, SEARCH_COUNT).await
    }

    async fn forecast(&self, request: &ForecastRequest) -> ForecastResult<ForecastResponse> {
        WeatherClient::forecast(self, request).await
    }

    async fn reverse(&self, coordinates: &Coordinates) -> ForecastResult<ReversePlace> {
        WeatherClient::reverse(self, coordinates).await
    }
}

/// Where to rate.
#[derive(Debug, PartialEq, Clone)]
pub enum LocationQuery {
    /// A fix from the device or the command line
    Coordinates(Coordinates),
    /// A place name, the index of the chosen candidate, and a region
    /// allow-list for the candidates
    Place {
        name: String,
        pick: usize,
        regions: Vec<String>,
    },
    /// Whatever the session last saw
    LastKnown,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub label: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RateRequest {
    pub location: LocationQuery,
    pub date: NaiveDate,
    pub timezone: String,
    pub wind_unit: WindUnit,
    pub modifiers: Modifiers,
    pub config: RatingConfig,
    pub exposure: ExposureConfig,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RatedDay {
    pub location: ResolvedLocation,
    pub date: NaiveDate,
    pub observations: Vec<HourlyObservation>,
    pub summary: Option<DailySummary>,
    pub report: DayReport,
}

/// Result of a successful request. `NoData` is not an all-clear.
#[derive(Debug, PartialEq, Clone)]
pub enum DayOutcome {
    NoData {
        location: ResolvedLocation,
        date: NaiveDate,
    },
    Rated(Box<RatedDay>),
}

async fn label_for<C: Collaborators>(
    collaborators: &C,
    coordinates: &Coordinates,
) -> ForecastResult<String> {
    let place = collaborators.reverse(coordinates).await?;
    Ok(place.label().unwrap_or_else(|| coordinates.to_string()))
}

/// Turn a location query into coordinates, updating the session on a fix.
pub async fn resolve_location<C: Collaborators>(
    collaborators: &C,
    session: &mut SessionContext,
    query: &LocationQuery,
) -> anyhow::Result<ResolvedLocation> {
    match query {
        LocationQuery::Coordinates(coordinates) => {
            session.remember(*coordinates);
            let label = label_for(collaborators, coordinates).await?;
            Ok(ResolvedLocation {
                coordinates: *coordinates,
                label,
            })
        }
        LocationQuery::Place {
            name,
            pick,
            regions,
        } => {
            let candidates = collaborators.search(name).await?;
            let near = session.fallback();
            let ranked = rank_places(candidates, regions, near.as_ref());
            if ranked.is_empty() {
                return Err(ForecastError::NoMatches(name.clone()).into());
            }
            let Some(place) = ranked.get(*pick) else {
                anyhow::bail!(
                    "Only {} matches for {:?}, cannot pick #{}",
                    ranked.len(),
                    name,
                    pick
                );
            };
            info!("Using {}", place.label());
            session.remember(place.coordinates());
            Ok(ResolvedLocation {
                coordinates: place.coordinates(),
                label: place.short_label(),
            })
        }
        LocationQuery::LastKnown => {
            let Some(coordinates) = session.fallback() else {
                anyhow::bail!(
                    "No location given and no last known location. Use --place or --lat/--lon."
                );
            };
            let label = label_for(collaborators, &coordinates).await?;
            Ok(ResolvedLocation { coordinates, label })
        }
    }
}

/// Run one evaluation request end to end.
pub async fn evaluate<C: Collaborators>(
    collaborators: &C,
    session: &mut SessionContext,
    request: &RateRequest,
) -> anyhow::Result<DayOutcome> {
    let location = resolve_location(collaborators, session, &request.location).await?;
    let forecast_request =
        ForecastRequest::new(location.coordinates, &request.timezone, request.wind_unit);
    let forecast = collaborators
        .forecast(&forecast_request)
        .await?
        .validate(request.wind_unit)?;
    let day = forecast.day(request.date);
    if !day.observations.iter().any(HourlyObservation::is_valid) {
        info!("No usable hourly data for {} on {}", location.label, request.date);
        return Ok(DayOutcome::NoData {
            location,
            date: request.date,
        });
    }
    let conditions = day.summary.as_ref().and_then(DailySummary::conditions);
    let report = rate_day(
        &day.observations,
        conditions.as_ref(),
        &request.modifiers,
        &request.config,
        &request.exposure,
    );
    Ok(DayOutcome::Rated(Box::new(RatedDay {
        location,
        date: request.date,
        observations: day.observations,
        summary: day.summary,
        report,
    })))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use kwa_rating::AdvisoryTier;
    use std::cell::Cell;

    pub(crate) const FORECAST_BODY: &str = r#"{
  "latitude": 47.77, "longitude": -116.79, "timezone": "America/Los_Angeles",
  "hourly": {
    "time": ["2024-06-01T08:00", "2024-06-01T09:00", "2024-06-01T10:00", "2024-06-02T08:00"],
    "temperature_2m": [40.0, 42.0, 44.0, 50.0],
    "precipitation_probability": [0, 0, 10, 20],
    "wind_speed_10m": [8.0, 12.0, 6.0, null],
    "wind_gusts_10m": [12.0, 18.0, 9.0, null],
    "wind_direction_10m": [200, 210, 190, 180]
  },
  "daily": {
    "time": ["2024-06-01", "2024-06-02"],
    "temperature_2m_max": [40.0, 60.0],
    "temperature_2m_min": [30.0, 45.0],
    "wind_speed_10m_max": [12.0, 5.0]
  }
}"#;

    const HAYDEN: &str = r#"{"results": [
    {"name": "Hayden", "latitude": 40.4958, "longitude": -107.2573,
     "country": "United States", "admin1": "Colorado", "population": 1938},
    {"name": "Hayden", "latitude": 47.76602, "longitude": -116.78659,
     "country": "United States", "admin1": "Idaho", "population": 15570}
]}"#;

    /// Canned responses; counts forecast calls.
    pub(crate) struct FakeCollaborators {
        pub forecast_body: &'static str,
        pub fail_forecast: bool,
        pub forecast_calls: Cell<usize>,
    }

    impl FakeCollaborators {
        pub(crate) fn new() -> Self {
            FakeCollaborators {
                forecast_body: FORECAST_BODY,
                fail_forecast: false,
                forecast_calls: Cell::new(0),
            }
        }
    }

    impl Collaborators for FakeCollaborators {
        async fn search(&self, name: &str) -> ForecastResult<Vec<Place>> {
            if name.eq_ignore_ascii_case("hayden") {
                Ok(serde_json::from_str::<kwa_forecast::geocode::GeocodingResponse>(HAYDEN)?
                    .into_places())
            } else {
                Ok(Vec::new())
            }
        }

        async fn forecast(&self, _request: &ForecastRequest) -> ForecastResult<ForecastResponse> {
            self.forecast_calls.set(self.forecast_calls.get() + 1);
            if self.fail_forecast {
                return Err(ForecastError::BadStatus {
                    url: String::from("https://api.open-meteo.com/v1/forecast"),
                    status: 502,
                });
            }
            ForecastResponse::from_json(self.forecast_body)
        }

        async fn reverse(&self, _coordinates: &Coordinates) -> ForecastResult<ReversePlace> {
            Ok(serde_json::from_str(
                r#"{"address": {"city": "Hayden", "state": "Idaho", "country": "United States"}}"#,
            )?)
        }
    }

    pub(crate) fn request(location: LocationQuery, day: u32) -> RateRequest {
        RateRequest {
            location,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            timezone: String::from("America/Los_Angeles"),
            wind_unit: WindUnit::Mph,
            modifiers: Modifiers::default(),
            config: RatingConfig::small_water(),
            exposure: ExposureConfig::default(),
        }
    }

    fn place(name: &str) -> LocationQuery {
        LocationQuery::Place {
            name: name.to_string(),
            pick: 0,
            regions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_rates_windy_morning() {
        let fake = FakeCollaborators::new();
        let mut session = SessionContext::default();
        let outcome = evaluate(&fake, &mut session, &request(place("Hayden"), 1))
            .await
            .unwrap();
        let DayOutcome::Rated(rated) = outcome else {
            panic!("expected a rated day");
        };
        // most populous Hayden wins without a last known location
        assert_eq!(rated.location.label, "Hayden, Idaho, United States");
        let worst = rated.report.worst_hour.as_ref().unwrap();
        assert_eq!(worst.tier, AdvisoryTier::Caution);
        assert_eq!(worst.score, 60);
        // 40/30 F is moderate exposure, which leaves the wind verdict alone
        let exposure = rated.report.exposure.unwrap();
        assert_eq!(exposure.risk, kwa_rating::ExposureRisk::Moderate);
        assert_eq!(rated.report.verdict(), Some(AdvisoryTier::Caution));
        assert_eq!(
            session.fallback(),
            Some(Coordinates::new(47.76602, -116.78659))
        );
    }

    #[tokio::test]
    async fn test_all_invalid_day_is_no_data() {
        let fake = FakeCollaborators::new();
        let mut session = SessionContext::default();
        let outcome = evaluate(&fake, &mut session, &request(place("Hayden"), 2))
            .await
            .unwrap();
        assert!(matches!(outcome, DayOutcome::NoData { .. }));

        let outcome = evaluate(&fake, &mut session, &request(LocationQuery::LastKnown, 20))
            .await
            .unwrap();
        assert!(matches!(outcome, DayOutcome::NoData { .. }));
    }

    #[tokio::test]
    async fn test_last_known_fallback() {
        let fake = FakeCollaborators::new();
        let mut session = SessionContext::default();
        let err = evaluate(&fake, &mut session, &request(LocationQuery::LastKnown, 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no last known location"));
        assert_eq!(fake.forecast_calls.get(), 0);

        session.remember(Coordinates::new(47.7, -116.8));
        let outcome = evaluate(&fake, &mut session, &request(LocationQuery::LastKnown, 1))
            .await
            .unwrap();
        let DayOutcome::Rated(rated) = outcome else {
            panic!("expected a rated day");
        };
        assert_eq!(rated.location.label, "Hayden, Idaho, United States");
    }

    #[tokio::test]
    async fn test_coordinates_update_session() {
        let fake = FakeCollaborators::new();
        let mut session = SessionContext::default();
        let here = Coordinates::new(47.9, -116.6);
        evaluate(&fake, &mut session, &request(LocationQuery::Coordinates(here), 1))
            .await
            .unwrap();
        assert_eq!(session.fallback(), Some(here));
    }

    #[tokio::test]
    async fn test_no_matches_and_bad_pick() {
        let fake = FakeCollaborators::new();
        let mut session = SessionContext::default();
        let err = evaluate(&fake, &mut session, &request(place("Atlantis"), 1))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("No matches found for Atlantis"));

        let out_of_range = LocationQuery::Place {
            name: String::from("Hayden"),
            pick: 5,
            regions: Vec::new(),
        };
        assert!(evaluate(&fake, &mut session, &request(out_of_range, 1))
            .await
            .is_err());
        assert_eq!(session.fallback(), None);
        assert_eq!(fake.forecast_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_region_allow_list() {
        let fake = FakeCollaborators::new();
        let mut session = SessionContext::default();
        let colorado = LocationQuery::Place {
            name: String::from("Hayden"),
            pick: 0,
            regions: vec![String::from("Colorado")],
        };
        evaluate(&fake, &mut session, &request(colorado, 1))
            .await
            .unwrap();
        assert_eq!(
            session.fallback(),
            Some(Coordinates::new(40.4958, -107.2573))
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_aborts() {
        let fake = FakeCollaborators {
            fail_forecast: true,
            ..FakeCollaborators::new()
        };
        let mut session = SessionContext::default();
        let err = evaluate(&fake, &mut session, &request(place("Hayden"), 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("status 502"));
        assert_eq!(fake.forecast_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_malformed_forecast_is_rejected() {
        let fake = FakeCollaborators {
            forecast_body: r#"{"latitude": 1.0, "longitude": 2.0, "hourly": {"time": []}}"#,
            ..FakeCollaborators::new()
        };
        let mut session = SessionContext::default();
        let err = evaluate(&fake, &mut session, &request(place("Hayden"), 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing required series"));
    }
}
