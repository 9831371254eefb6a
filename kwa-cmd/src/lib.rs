//! Command implementations for the KWA CLI.
//!
//! Provides subcommands for rating a day on the water, looking up places,
//! and managing the saved last known location.

use clap::Subcommand;
use std::path::PathBuf;

pub mod evaluate;
pub mod places;
pub mod rate;
pub mod session;

#[derive(Subcommand)]
pub enum Command {
    /// Rate wind risk for one day at one location
    Rate(rate::RateArgs),

    /// List geocoding candidates for a place name, numbered for `rate --pick`
    Places {
        /// Place name to search for
        name: String,

        /// Only list places in these regions (comma separated)
        #[arg(long, value_delimiter = ',')]
        region: Vec<String>,
    },

    /// Show the place name for a pair of coordinates
    Where {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Clear the last known location from the session file
    Forget,
}

pub async fn run(command: Command, session_file: Option<PathBuf>) -> anyhow::Result<()> {
    let session_file = session_file.as_deref();
    match command {
        Command::Rate(args) => rate::run_rate(&args, session_file).await,
        Command::Places { name, region } => {
            places::run_places(&name, &region, session_file).await
        }
        Command::Where { lat, lon } => places::run_where(lat, lon).await,
        Command::Forget => match session_file {
            Some(path) => session::forget(path),
            None => anyhow::bail!("forget needs --session-file"),
        },
    }
}
