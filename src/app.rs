//! Command-line driver: configuration loading, seeding, resume and output
//! wiring around [`plastica_core::run_epochs`].

use anyhow::Context;
use plastica_core::config::AppConfig;
use plastica_core::{run_epochs, Metrics, Model, Population};
use plastica_io::{FileRecorder, PopulationSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// Everything one invocation needs besides the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub config: AppConfig,
    pub trajectory: Option<PathBuf>,
    pub snapshot_base: Option<String>,
    pub resume: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub population: Population,
    pub seed: u64,
    pub first_epoch: usize,
    pub last_epoch: usize,
    pub checkpoint: Option<PathBuf>,
    pub generations: u64,
    pub shortfalls: u64,
}

/// Reads `path` if it exists, otherwise returns the defaults.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("loading config {}", path.display()))
}

/// Runs the configured number of epochs, fresh or from a snapshot.
pub fn run(settings: RunSettings) -> anyhow::Result<RunSummary> {
    let model = Model::new(settings.config)?;
    let run = model.config.run.clone();

    let seed = run.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (population, first_epoch) = match &settings.resume {
        Some(path) => {
            let snapshot = PopulationSnapshot::load(path, &model)?;
            snapshot
                .ensure_resumable()
                .with_context(|| format!("resuming from {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                epoch = snapshot.epoch,
                generation = snapshot.population.generation,
                "Resuming from snapshot"
            );
            (snapshot.population, snapshot.epoch + 1)
        }
        None => (Population::new_random(&model, &mut rng), 0),
    };
    tracing::info!(
        seed = seed,
        ngenes = model.ngenes(),
        nenv = model.nenv(),
        ncells = model.ncells(),
        population = model.config.evolution.population_size,
        epochs = run.epochs,
        "Starting run"
    );

    let mut recorder = FileRecorder::new(&model).resuming(settings.resume.is_some());
    if let Some(path) = &settings.trajectory {
        recorder = recorder.with_trajectory(path)?;
    }
    if let Some(base) = &settings.snapshot_base {
        recorder = recorder.with_snapshots(base)?;
    }

    let metrics = Metrics::new();
    let population = run_epochs(
        population,
        &model,
        first_epoch,
        run.epochs,
        &mut rng,
        &mut recorder,
        &metrics,
    )?;

    let last_epoch = (first_epoch + run.epochs).saturating_sub(1);
    let checkpoint = recorder.write_checkpoint(last_epoch, &population)?;
    recorder.finish()?;

    tracing::info!(
        generations = metrics.generation_count(),
        unconverged = metrics.unconverged_count(),
        shortfalls = metrics.shortfall_count(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "Run finished"
    );

    Ok(RunSummary {
        population,
        seed,
        first_epoch,
        last_epoch,
        checkpoint,
        generations: metrics.generation_count(),
        shortfalls: metrics.shortfall_count(),
    })
}
