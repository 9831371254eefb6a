//! KWA CLI - Command line tool for rating wind risk on a day of kayaking.

use clap::Parser;
use log::debug;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kwa-cli",
    version,
    about = "Kayak Wind Advisor: GO / CAUTION / DO NOT GO from the hourly wind forecast"
)]
struct Cli {
    /// JSON file holding the last known location between runs
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: kwa_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Session file: {:?}", cli.session_file);
    kwa_cmd::run(cli.command, cli.session_file).await
}
