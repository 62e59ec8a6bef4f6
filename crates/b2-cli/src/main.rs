//! `b2hhh-scan` — sequential muon-filtered scan over a decay container.
//!
//! Streams every record of the input container once, skips muon-tagged
//! records, sums the remaining candidates' kinematics and prints a progress
//! line every 100,000 records plus a final summary. The presence of any
//! second positional argument switches to the reduced plot-only
//! accumulation (H1 px alone), reading only the columns that mode needs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use b2_core::{scan_events, ScanMode};
use b2_events::{EventReader, Projection};

#[derive(Parser)]
#[command(name = "b2hhh-scan")]
#[command(about = "Scan a B2HHH decay container: count, filter and sum candidate kinematics")]
#[command(version)]
struct Cli {
    /// Input container file (Parquet, decay layout).
    input: PathBuf,

    /// Any second argument selects plot-only accumulation; its value is ignored.
    plot: Option<String>,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Write the final summary as pretty JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let mode = if cli.plot.is_some() { ScanMode::PlotOnly } else { ScanMode::Full };
    if mode == ScanMode::PlotOnly {
        println!("Plotting!");
    }

    let projection = match mode {
        ScanMode::Full => Projection::Full,
        ScanMode::PlotOnly => Projection::PlotOnly,
    };
    let reader = EventReader::open_with_projection(&cli.input, projection)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    tracing::info!(events = reader.n_events(), "container opened");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = scan_events(reader, mode, &mut out)?;
    summary.write_report(&mut out)?;

    if let Some(path) = cli.json {
        let text = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
