//! # Tide Window Application Entry Point
//!
//! Command-line front end for the tide window library. Loads configuration and
//! reference data once, runs a single forecast and prints the windows as a
//! list, as JSON, or with an ASCII depth chart.


mod cli;
mod logging;

use std::process;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use tide_window_lib::{
    config::Config,
    registry::{ReferenceData, ReferenceDocument},
    renderer::render_ascii,
    synthetic::{harmonic_samples, HarmonicModel},
    Forecaster, Port, Vessel, Window,
};

use crate::cli::{Cli, CombinedArgs, Command, DemoArgs, WindowArgs};

/// Window list written by `--json`.
#[derive(Serialize)]
struct WindowReport<'a> {
    vessel: &'a Vessel,
    port: &'a Port,
    arrival: NaiveDateTime,
    tidal: &'a [Window],
    #[serde(skip_serializing_if = "Option::is_none")]
    daylight: Option<&'a [Window]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    combined: Option<&'a [Window]>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from_path(&cli.config);
    match cli.command {
        Command::Tidal(args) => tidal(&config, args),
        Command::Combined(args) => combined(&config, args),
        Command::Demo(args) => demo(&config, args),
        Command::InitConfig => Config::default()
            .save_to_path(&cli.config)
            .with_context(|| format!("writing {}", cli.config.display())),
    }
}

fn load_reference(config: &Config, args: &WindowArgs) -> Result<ReferenceData> {
    let path = args
        .data
        .clone()
        .unwrap_or_else(|| config.data.reference_path.clone());
    ReferenceData::load(&path)
        .with_context(|| format!("loading reference data from {}", path.display()))
}

fn tidal(config: &Config, args: WindowArgs) -> Result<()> {
    let reference = load_reference(config, &args)?;
    let forecast = Forecaster::new(&reference)
        .with_settings(config.forecast_settings())
        .compute_tidal_windows(args.vessel, &args.port, args.arrival)
        .context("computing tidal windows")?;

    info!(windows = forecast.windows.len(), "tidal forecast complete");

    if args.json {
        let report = WindowReport {
            vessel: &forecast.vessel,
            port: &forecast.port,
            arrival: args.arrival,
            tidal: &forecast.windows,
            daylight: None,
            combined: None,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&forecast.vessel, &forecast.port, args.arrival);
    print_windows("Tidal windows", &forecast.windows);

    if args.plot {
        println!();
        println!(
            "{}",
            render_ascii(
                &forecast.series,
                forecast.vessel.draught,
                &forecast.windows,
                &[],
                config.display.width,
                config.display.rows,
            )
        );
    }
    Ok(())
}

fn combined(config: &Config, args: CombinedArgs) -> Result<()> {
    let reference = load_reference(config, &args.window)?;
    let days = args.days.unwrap_or(config.forecast.daylight_days);
    let window = args.window;

    let forecast = Forecaster::new(&reference)
        .with_settings(config.forecast_settings())
        .compute_combined_windows(window.vessel, &window.port, window.arrival, days)
        .context("computing combined windows")?;

    info!(
        tidal = forecast.tidal.len(),
        combined = forecast.combined.len(),
        "combined forecast complete"
    );

    if window.json {
        let report = WindowReport {
            vessel: &forecast.vessel,
            port: &forecast.port,
            arrival: window.arrival,
            tidal: &forecast.tidal,
            daylight: Some(forecast.daylight.as_slice()),
            combined: Some(forecast.combined.as_slice()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&forecast.vessel, &forecast.port, window.arrival);
    print_windows("Combined tidal + daylight windows", &forecast.combined);

    if window.plot {
        println!();
        println!(
            "{}",
            render_ascii(
                &forecast.series,
                forecast.vessel.draught,
                &forecast.tidal,
                &forecast.combined,
                config.display.width,
                config.display.rows,
            )
        );
    }
    Ok(())
}

/// Run a combined forecast against an in-memory port with harmonic tides.
fn demo(config: &Config, args: DemoArgs) -> Result<()> {
    let arrival = args
        .arrival
        .unwrap_or_else(|| Local::now().date_naive().and_time(NaiveTime::default()));

    let port = Port {
        unlocode: "XXDEM".to_string(),
        name: "Demo Harbour".to_string(),
        latitude: -27.38,
        longitude: 153.17,
        approach_depth: 14.0,
    };
    let vessel = Vessel {
        imo: 9000001,
        draught: args.draught,
        name: "DEMO CARRIER".to_string(),
        dwt: 80_000.0,
    };

    // Tide samples every 30 minutes, starting a day early to avoid extrapolation
    let horizon_hours = config.forecast_settings().horizon.num_hours();
    let tide_samples = harmonic_samples(
        &port.name,
        arrival - Duration::days(1),
        horizon_hours + 48,
        30,
        &HarmonicModel::m2_s2(1.6),
    );

    let reference = ReferenceData::from_document(ReferenceDocument {
        vessels: vec![vessel],
        ports: vec![port],
        tide_samples,
    })?;

    let forecast = Forecaster::new(&reference)
        .with_settings(config.forecast_settings())
        .compute_combined_windows(9000001, "XXDEM", arrival, config.forecast.daylight_days)
        .context("computing demo windows")?;

    print_header(&forecast.vessel, &forecast.port, arrival);
    print_windows("Tidal windows", &forecast.tidal);
    print_windows("Combined tidal + daylight windows", &forecast.combined);
    println!();
    println!(
        "{}",
        render_ascii(
            &forecast.series,
            forecast.vessel.draught,
            &forecast.tidal,
            &forecast.combined,
            config.display.width,
            config.display.rows,
        )
    );
    Ok(())
}

fn print_header(vessel: &Vessel, port: &Port, arrival: NaiveDateTime) {
    println!(
        "{} (IMO {}, draught {:.2} m) at {} [{}], approach depth {:.2} m",
        vessel.name, vessel.imo, vessel.draught, port.name, port.unlocode, port.approach_depth
    );
    println!("Arrival: {}", arrival.format("%Y-%m-%d %H:%M"));
}

fn print_windows(title: &str, windows: &[Window]) {
    println!();
    println!("{title}: {}", windows.len());
    for (i, window) in windows.iter().enumerate() {
        println!("{:>4}. {}", i + 1, format_window(window));
    }
}

/// `2024-03-01 03:01 → 2024-03-01 09:00  (5h59m)`
fn format_window(window: &Window) -> String {
    let minutes = window.duration().num_minutes();
    format!(
        "{} → {}  ({}h{:02}m)",
        window.start.format("%Y-%m-%d %H:%M"),
        window.end.format("%Y-%m-%d %H:%M"),
        minutes / 60,
        minutes % 60
    )
}
