use anyhow::Result;
use clap::Parser;
use plastica_lib::app::{self, RunSettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Master RNG seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of epochs; overrides the config file
    #[arg(long)]
    epochs: Option<usize>,

    /// Generations per epoch; overrides the config file
    #[arg(long)]
    generations: Option<usize>,

    /// Write a snapshot and genealogy record every generation
    #[arg(long)]
    test_mode: bool,

    /// Trajectory output (TSV)
    #[arg(short, long)]
    trajectory: Option<PathBuf>,

    /// Prefix for snapshot, checkpoint and genealogy files
    #[arg(long)]
    snapshot_base: Option<String>,

    /// Continue from a saved snapshot
    #[arg(long)]
    resume: Option<PathBuf>,
}

fn main() -> Result<()> {
    plastica_core::init_logging();
    let args = Args::parse();

    let mut config = app::load_config(&args.config)?;
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
    if let Some(epochs) = args.epochs {
        config.run.epochs = epochs;
    }
    if let Some(generations) = args.generations {
        config.run.generations_per_epoch = generations;
    }
    config.run.test_mode |= args.test_mode;

    let summary = app::run(RunSettings {
        config,
        trajectory: args.trajectory,
        snapshot_base: args.snapshot_base,
        resume: args.resume,
    })?;

    println!(
        "Finished epochs {}..={} (seed {}): {} generations, {} individuals, mean genome norm {:.4}.",
        summary.first_epoch,
        summary.last_epoch,
        summary.seed,
        summary.generations,
        summary.population.len(),
        summary
            .population
            .mean_genome()
            .map_or(0.0, |g| plastica_core::GenomeLogic::frobenius_norm(&g))
    );
    if summary.shortfalls > 0 {
        println!("{} reproduction step(s) fell short of the target size.", summary.shortfalls);
    }
    if let Some(path) = summary.checkpoint {
        println!("Checkpoint written to {}", path.display());
    }
    Ok(())
}
