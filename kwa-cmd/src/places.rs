//! The `places` and `where` commands.

use kwa_forecast::client::WeatherClient;
use kwa_forecast::geocode::{rank_places, Coordinates, Place, SEARCH_COUNT};
use kwa_forecast::ForecastError;
use std::path::Path;

use crate::session::SessionContext;

/// One numbered line per candidate, in the order `--pick` indexes them.
pub fn render_places(places: &[Place]) -> String {
    places
        .iter()
        .enumerate()
        .map(|(i, place)| match place.population {
            Some(population) => format!("{:>2}  {}  pop. {}\n", i, place.label(), population),
            None => format!("{:>2}  {}\n", i, place.label()),
        })
        .collect()
}

/// Search for a place name and print the ranked candidates. Ranking is
/// biased toward the session's last known location when there is one.
pub async fn run_places(
    name: &str,
    regions: &[String],
    session_file: Option<&Path>,
) -> anyhow::Result<()> {
    let session = match session_file {
        Some(path) => SessionContext::load(path)?,
        None => SessionContext::default(),
    };
    let client = WeatherClient::new()?;
    let candidates = client.search(name, SEARCH_COUNT).await?;
    let near = session.fallback();
    let ranked = rank_places(candidates, regions, near.as_ref());
    if ranked.is_empty() {
        return Err(ForecastError::NoMatches(name.to_string()).into());
    }
    print!("{}", render_places(&ranked));
    Ok(())
}

/// Print the reverse geocoded name for a pair of coordinates.
pub async fn run_where(latitude: f64, longitude: f64) -> anyhow::Result<()> {
    let coordinates = Coordinates::new(latitude, longitude);
    let client = WeatherClient::new()?;
    let place = client.reverse(&coordinates).await?;
    match place.label() {
        Some(label) => println!("{} ({})", label, coordinates),
        None => println!("Nothing named at {}", coordinates),
    }
    Ok(())
}
