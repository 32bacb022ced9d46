use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};

use tide_window_lib::config::DEFAULT_CONFIG_PATH;

/// Tidal and daylight navigability windows for port approach channels.
#[derive(Parser)]
#[command(
    name = "tide-window",
    version,
    about = "Tidal and daylight navigability window forecasts"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Tidal windows for a vessel arriving at a port.
    Tidal(WindowArgs),
    /// Tidal windows restricted to daylight.
    Combined(CombinedArgs),
    /// Combined windows for a synthetic port, no reference data needed.
    Demo(DemoArgs),
    /// Write the default configuration file.
    InitConfig,
}

/// Arguments shared by the `tidal` and `combined` subcommands.
#[derive(clap::Args)]
pub struct WindowArgs {
    /// Vessel IMO number.
    #[arg(long)]
    pub vessel: u64,

    /// Port UN/LOCODE.
    #[arg(long)]
    pub port: String,

    /// Arrival time, e.g. 2024-03-01T06:00 (naive clock time).
    #[arg(long, value_parser = parse_arrival)]
    pub arrival: NaiveDateTime,

    /// Override the reference data path from config.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Print a depth chart after the window list.
    #[arg(long)]
    pub plot: bool,

    /// Print the windows as JSON.
    #[arg(long, conflicts_with = "plot")]
    pub json: bool,
}

/// Arguments for the `combined` subcommand.
#[derive(clap::Args)]
pub struct CombinedArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Days of daylight windows, overrides config.
    #[arg(long)]
    pub days: Option<u32>,
}

/// Arguments for the `demo` subcommand.
#[derive(clap::Args)]
pub struct DemoArgs {
    /// Arrival time; defaults to today at midnight.
    #[arg(long, value_parser = parse_arrival)]
    pub arrival: Option<NaiveDateTime>,

    /// Draught of the demo vessel in metres.
    #[arg(long, default_value_t = 15.2)]
    pub draught: f64,
}

/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, the same with a space separator, or a bare
/// date (midnight).
pub fn parse_arrival(value: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::default()))
        })
        .ok_or_else(|| format!("invalid arrival time '{value}', expected YYYY-MM-DDTHH:MM[:SS]"))
}
