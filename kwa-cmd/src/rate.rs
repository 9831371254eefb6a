//! The `rate` command: rate one day at one location.

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use csv::Writer;
use kwa_forecast::client::WeatherClient;
use kwa_forecast::forecast::DEFAULT_TIMEZONE;
use kwa_forecast::geocode::Coordinates;
use kwa_rating::{
    CautionBoundary, Composition, ExposureConfig, HourRow, Modifiers, RatingConfig,
};
use kwa_utils::compass::deg_to_compass;
use kwa_utils::dates::{day_label, display_timestamp, resolve_day};
use kwa_utils::units::WindUnit;
use log::info;
use std::fmt::Write as _;
use std::path::Path;

use crate::evaluate::{evaluate, DayOutcome, LocationQuery, RateRequest, RatedDay};
use crate::session::SessionContext;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetArg {
    /// Small-water thresholds, modifiers bump one tier
    SmallWater,
    /// Modifiers switch to the big-water thresholds
    BigWaterProfile,
    /// 11/16 thresholds with an inclusive boundary
    LegacyInclusive,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionArg {
    Bump,
    Profile,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryArg {
    /// Sustained or gust strictly above the GO limit
    Exclusive,
    /// Sustained or gust at or above the GO limit
    Inclusive,
}

#[derive(Args, Debug, Clone)]
pub struct RateArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lon", conflicts_with = "place")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Place name to geocode (without it, the last known location is used)
    #[arg(short, long)]
    pub place: Option<String>,

    /// Which ranked candidate to use, see the `places` command
    #[arg(long, default_value_t = 0, requires = "place")]
    pub pick: usize,

    /// Only consider places in these regions (comma separated)
    #[arg(long, value_delimiter = ',', requires = "place")]
    pub region: Vec<String>,

    /// today, tomorrow, or YYYY-MM-DD
    #[arg(short, long, default_value = "today")]
    pub day: String,

    /// Wind unit for the request and the table: mph, kn, kmh or ms
    #[arg(short, long, default_value = "mph")]
    pub unit: WindUnit,

    /// IANA time zone the forecast hours are reported in
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Wind is blowing away from shore
    #[arg(long)]
    pub offshore: bool,

    /// Large lake or long open-water fetch
    #[arg(long)]
    pub big_water: bool,

    #[arg(long, value_enum, default_value_t = PresetArg::SmallWater)]
    pub preset: PresetArg,

    /// Override the preset's modifier composition
    #[arg(long, value_enum)]
    pub composition: Option<CompositionArg>,

    /// Override the preset's CAUTION boundary
    #[arg(long, value_enum)]
    pub caution_boundary: Option<BoundaryArg>,

    /// GO limit for sustained wind, mph
    #[arg(long)]
    pub go_sustained: Option<f64>,

    /// GO limit for gusts, mph
    #[arg(long)]
    pub go_gust: Option<f64>,

    /// DO NOT GO limit for sustained wind, mph
    #[arg(long)]
    pub nogo_sustained: Option<f64>,

    /// DO NOT GO limit for gusts, mph
    #[arg(long)]
    pub nogo_gust: Option<f64>,

    /// Also write the hourly table to this CSV file
    #[arg(long)]
    pub table_csv: Option<std::path::PathBuf>,
}

impl RateArgs {
    pub fn rating_config(&self) -> RatingConfig {
        let mut config = match self.preset {
            PresetArg::SmallWater => RatingConfig::small_water(),
            PresetArg::BigWaterProfile => RatingConfig::big_water_profile(),
            PresetArg::LegacyInclusive => RatingConfig::legacy_inclusive(),
        };
        match self.composition {
            Some(CompositionArg::Bump) => config.composition = Composition::Bump,
            Some(CompositionArg::Profile) => config.composition = Composition::Profile,
            None => {}
        }
        match self.caution_boundary {
            Some(BoundaryArg::Exclusive) => config.caution_boundary = CautionBoundary::Exclusive,
            Some(BoundaryArg::Inclusive) => config.caution_boundary = CautionBoundary::Inclusive,
            None => {}
        }
        if let Some(v) = self.go_sustained {
            config.base.go_sustained = v;
        }
        if let Some(v) = self.go_gust {
            config.base.go_gust = v;
        }
        if let Some(v) = self.nogo_sustained {
            config.base.nogo_sustained = v;
        }
        if let Some(v) = self.nogo_gust {
            config.base.nogo_gust = v;
        }
        config
    }

    pub fn location(&self) -> LocationQuery {
        match (self.lat, self.lon, &self.place) {
            (Some(lat), Some(lon), _) => LocationQuery::Coordinates(Coordinates::new(lat, lon)),
            (_, _, Some(name)) => LocationQuery::Place {
                name: name.clone(),
                pick: self.pick,
                regions: self.region.clone(),
            },
            _ => LocationQuery::LastKnown,
        }
    }

    pub fn request(&self, today: &NaiveDate) -> anyhow::Result<RateRequest> {
        Ok(RateRequest {
            location: self.location(),
            date: resolve_day(&self.day, today)?,
            timezone: self.timezone.clone(),
            wind_unit: self.unit,
            modifiers: Modifiers {
                offshore: self.offshore,
                big_water: self.big_water,
            },
            config: self.rating_config(),
            exposure: ExposureConfig::default(),
        })
    }
}

fn speed(mph: f64, unit: WindUnit) -> String {
    format!("{:.0}", unit.from_mph(mph))
}

fn compass_or_dash(deg: f64) -> &'static str {
    if deg.is_finite() {
        deg_to_compass(deg)
    } else {
        "--"
    }
}

fn render_rated(
    out: &mut String,
    rated: &RatedDay,
    unit: WindUnit,
    today: &NaiveDate,
) -> std::fmt::Result {
    let report = &rated.report;
    let (Some(worst), Some(verdict)) = (&report.worst_hour, report.verdict()) else {
        return writeln!(out, "{}: no usable wind data.", day_label(&rated.date, today));
    };
    writeln!(out, "{}: {}", day_label(&rated.date, today), verdict)?;
    writeln!(out, "{}", worst.reason)?;

    let sample = &rated.observations[worst.index];
    writeln!(
        out,
        "Worst hour: {}, {} {} gusting {} from {} (score {})",
        display_timestamp(&worst.time),
        speed(sample.sustained_mph, unit),
        unit,
        speed(sample.gust_mph, unit),
        compass_or_dash(sample.direction_deg),
        worst.score
    )?;

    if let Some(summary) = &rated.summary {
        let mut parts = Vec::new();
        if let (Some(hi), Some(lo)) = (summary.temp_max_f, summary.temp_min_f) {
            parts.push(format!("high {:.0}F, low {:.0}F", hi, lo));
        }
        if let Some(wind) = summary.wind_max_mph {
            parts.push(format!("max wind {} {}", speed(wind, unit), unit));
        }
        if let Some(gust) = summary.gust_max_mph {
            match summary.dominant_direction_deg {
                Some(deg) if deg.is_finite() => parts.push(format!(
                    "gusts {} {} from {}",
                    speed(gust, unit),
                    unit,
                    deg_to_compass(deg)
                )),
                _ => parts.push(format!("gusts {} {}", speed(gust, unit), unit)),
            }
        }
        match (summary.precipitation_probability_max, summary.precipitation_sum_in) {
            (Some(pop), Some(sum)) => parts.push(format!("precip {:.0}% ({:.2} in)", pop, sum)),
            (Some(pop), None) => parts.push(format!("precip {:.0}%", pop)),
            (None, _) => {}
        }
        if let (Some(rise), Some(set)) = (summary.sunrise, summary.sunset) {
            parts.push(format!("daylight {}-{}", rise.format("%H:%M"), set.format("%H:%M")));
        }
        if !parts.is_empty() {
            writeln!(out, "Daily: {}", parts.join(", "))?;
        }
    }
    if let Some(exposure) = &report.exposure {
        writeln!(out, "Cold exposure: {}", exposure.risk)?;
    }
    if let Some(window) = &report.worst_window {
        writeln!(
            out,
            "Worst window: {}-{}, avg {} {} gusting {} (score {:.1})",
            window.start.format("%H:%M"),
            window.end.format("%H:%M"),
            speed(window.sustained_avg, unit),
            unit,
            speed(window.gust_avg, unit),
            window.avg_score
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{:<17} {:>5} {:>5} {:>4}  Rating", "Time", "Wind", "Gust", "Dir")?;
    for row in &report.table {
        writeln!(
            out,
            "{:<17} {:>5} {:>5} {:>4}  {}",
            display_timestamp(&row.time),
            speed(row.sustained_mph, unit),
            speed(row.gust_mph, unit),
            row.compass,
            row.tier
        )?;
    }

    writeln!(out)?;
    for note in &report.notes {
        writeln!(out, "- {}", note)?;
    }
    Ok(())
}

/// Human readable result of a `rate` request.
pub fn render_outcome(
    outcome: &DayOutcome,
    unit: WindUnit,
    today: &NaiveDate,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    match outcome {
        DayOutcome::NoData { location, date } => writeln!(
            out,
            "{}\n{}: no forecast data for this date. This is not an all-clear.",
            location.label,
            day_label(date, today)
        )?,
        DayOutcome::Rated(rated) => {
            writeln!(out, "{}", rated.location.label)?;
            render_rated(&mut out, rated, unit, today)?;
        }
    }
    Ok(out)
}

/// Hourly table as CSV, wind in `unit`.
pub fn table_csv(rows: &[HourRow], unit: WindUnit) -> anyhow::Result<String> {
    let mut writer = Writer::from_writer(vec![]);
    writer.write_record(["Time", "Wind", "Gust", "Dir", "Rating"])?;
    for row in rows {
        writer.write_record([
            display_timestamp(&row.time),
            speed(row.sustained_mph, unit),
            speed(row.gust_mph, unit),
            row.compass.clone(),
            row.tier.to_string(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub async fn run_rate(args: &RateArgs, session_file: Option<&Path>) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let request = args.request(&today)?;
    let mut session = match session_file {
        Some(path) => SessionContext::load(path)?,
        None => SessionContext::default(),
    };
    let before = session.clone();

    let client = WeatherClient::new()?;
    let outcome = evaluate(&client, &mut session, &request).await?;

    if let Some(path) = session_file {
        if session != before {
            session.save(path)?;
        }
    }
    print!("{}", render_outcome(&outcome, args.unit, &today)?);

    if let (Some(path), DayOutcome::Rated(rated)) = (&args.table_csv, &outcome) {
        std::fs::write(path, table_csv(&rated.report.table, args.unit)?)?;
        info!("Hourly table written to {}", path.display());
    }
    Ok(())
}
