//! `b2hhh-gen` — deterministic pseudo-random decay containers.
//!
//! Produces container files in the decay layout for benchmarks and local
//! runs of `b2hhh-scan`, seeded so repeated invocations are identical.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use b2_core::{Event, KaonCandidate};
use b2_events::EventWriter;

#[derive(Parser)]
#[command(name = "b2hhh-gen")]
#[command(about = "Generate a pseudo-random B2HHH decay container")]
#[command(version)]
struct Cli {
    /// Output container path.
    #[arg(short, long)]
    output: PathBuf,

    /// Number of events to write.
    #[arg(short = 'n', long, default_value = "1000000")]
    events: u64,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Fraction of events carrying a muon tag on one candidate.
    #[arg(long, default_value = "0.15")]
    muon_fraction: f64,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

fn random_candidate(rng: &mut StdRng) -> KaonCandidate {
    KaonCandidate {
        px: rng.random_range(-100_000.0..100_000.0),
        py: rng.random_range(-100_000.0..100_000.0),
        pz: rng.random_range(0.0..500_000.0),
        prob_k: rng.random(),
        prob_pi: rng.random(),
        charge: if rng.random::<bool>() { 1 } else { -1 },
        is_muon: 0,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let mut writer = EventWriter::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;

    for i in 0..cli.events {
        let mut event = Event::new(
            random_candidate(&mut rng),
            random_candidate(&mut rng),
            random_candidate(&mut rng),
        );
        if rng.random::<f64>() < cli.muon_fraction {
            event.candidates[rng.random_range(0..3)].is_muon = 1;
        }
        writer.write(&event)?;
        if (i + 1) % 100_000 == 0 {
            tracing::info!(written = i + 1, "generating");
        }
    }

    writer.close()?;
    eprintln!("wrote {} events to {}", cli.events, cli.output.display());

    Ok(())
}
