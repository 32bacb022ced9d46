use tracing_subscriber::EnvFilter;

/// The binary and the forecasting library log under separate targets.
const CRATE_TARGETS: &[&str] = &["tide_window", "tide_window_lib"];

/// Route `tracing` output from both crate targets to stderr, so stdout stays
/// clean for window lists and `--json` reports.
///
/// `-v` raises the level from warn: once for per-command results, twice for
/// per-forecast pipeline detail, three times for dropped windows and polar
/// days. A `RUST_LOG` filter replaces the flag entirely.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let directives = CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}
