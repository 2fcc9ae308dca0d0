use crate::error::{IoError, Result};
use crate::genealogy::GenealogyWriter;
use crate::snapshot::{snapshot_path, PopulationSnapshot};
use crate::trajectory::TrajectoryWriter;
use plastica_core::{EvolutionObserver, Model, Population, TrajectoryRow};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// `{base}_genealogy.dot`
#[must_use]
pub fn genealogy_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{}_genealogy.dot", base))
}

/// `{base}_checkpoint.json`, the undeveloped population left after a run.
#[must_use]
pub fn checkpoint_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{}_checkpoint.json", base))
}

/// Writes run output to disk: trajectory rows and, in test mode, one
/// snapshot per generation plus the genealogy.
pub struct FileRecorder {
    fingerprint: String,
    trajectory: Option<TrajectoryWriter<BufWriter<File>>>,
    snapshot_base: Option<String>,
    genealogy: Option<GenealogyWriter<BufWriter<File>>>,
    snapshots_written: usize,
    resuming: bool,
}

impl FileRecorder {
    #[must_use]
    pub fn new(model: &Model) -> Self {
        Self {
            fingerprint: model.fingerprint(),
            trajectory: None,
            snapshot_base: None,
            genealogy: None,
            snapshots_written: 0,
            resuming: false,
        }
    }

    /// Extends the trajectory and genealogy of an earlier run instead of
    /// replacing them. Must be set before the outputs are opened.
    #[must_use]
    pub fn resuming(mut self, resuming: bool) -> Self {
        self.resuming = resuming;
        self
    }

    pub fn with_trajectory<P: Into<PathBuf>>(mut self, path: P) -> Result<Self> {
        let path = path.into();
        let writer = if self.resuming {
            TrajectoryWriter::append(path)?
        } else {
            TrajectoryWriter::create(path)?
        };
        self.trajectory = Some(writer);
        Ok(self)
    }

    /// Enables per-generation snapshots under `base` and opens the genealogy
    /// file next to them.
    pub fn with_snapshots(mut self, base: &str) -> Result<Self> {
        let path = genealogy_path(base);
        let writer = if self.resuming {
            GenealogyWriter::reopen(&path)?
        } else {
            let file = File::create(&path).map_err(|e| {
                IoError::FileSystem(e).with_context(format!("creating genealogy {:?}", path))
            })?;
            GenealogyWriter::new(BufWriter::new(file))?
        };
        self.genealogy = Some(writer);
        self.snapshot_base = Some(base.to_string());
        Ok(self)
    }

    #[must_use]
    pub fn snapshots_written(&self) -> usize {
        self.snapshots_written
    }

    /// Saves `population` as the resumable end state of a run.
    pub fn write_checkpoint(&self, epoch: usize, population: &Population) -> Result<Option<PathBuf>> {
        let Some(base) = &self.snapshot_base else {
            return Ok(None);
        };
        let path = checkpoint_path(base);
        self.snapshot(epoch, population).write(&path)?;
        Ok(Some(path))
    }

    fn snapshot(&self, epoch: usize, population: &Population) -> PopulationSnapshot {
        PopulationSnapshot {
            config_fingerprint: self.fingerprint.clone(),
            epoch,
            population: population.clone(),
        }
    }

    /// Flushes the trajectory and closes the genealogy graph.
    pub fn finish(self) -> Result<()> {
        if let Some(mut trajectory) = self.trajectory {
            trajectory.flush()?;
        }
        if let Some(genealogy) = self.genealogy {
            genealogy.finish()?;
        }
        Ok(())
    }
}

impl EvolutionObserver for FileRecorder {
    fn on_generation(&mut self, epoch: usize, population: &Population) -> anyhow::Result<()> {
        if let Some(base) = &self.snapshot_base {
            let path = snapshot_path(base, epoch, population.generation);
            self.snapshot(epoch, population).write(&path)?;
            self.snapshots_written += 1;
            tracing::debug!(path = ?path, "Snapshot written");
        }
        if let Some(genealogy) = &mut self.genealogy {
            genealogy.record(population)?;
        }
        Ok(())
    }

    fn on_trajectory(&mut self, row: &TrajectoryRow) -> anyhow::Result<()> {
        if let Some(trajectory) = &mut self.trajectory {
            trajectory.write_row(row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genealogy::Genealogy;
    use plastica_core::config::{AppConfig, DensityConfig, ModelConfig};
    use plastica_core::{EvolveOptions, Metrics};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_recorder_writes_all_outputs() {
        let mut config = AppConfig {
            model: ModelConfig {
                ngenes: 6,
                nenv: 3,
                ..Default::default()
            },
            density: DensityConfig::uniform(0.5),
            ..Default::default()
        };
        config.evolution.population_size = 6;
        let model = Model::new(config).unwrap();

        let dir = std::env::temp_dir().join(format!("plastica_recorder_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let base = dir.join("run").to_string_lossy().into_owned();
        let trajectory = dir.join("trajectory.tsv");

        let mut recorder = FileRecorder::new(&model)
            .with_trajectory(&trajectory)
            .unwrap()
            .with_snapshots(&base)
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let options = EvolveOptions {
            epoch: 0,
            generations: 3,
            test_mode: true,
        };
        let out = Population::new_random(&model, &mut rng)
            .evolve(&model, &mut rng, &mut recorder, options, &Metrics::new())
            .unwrap();
        assert_eq!(recorder.snapshots_written(), 3);
        let checkpoint = recorder.write_checkpoint(0, &out).unwrap().unwrap();
        recorder.finish().unwrap();

        let tsv = std::fs::read_to_string(&trajectory).unwrap();
        assert_eq!(tsv.lines().count(), 4);

        let paths: Vec<PathBuf> = (1..=3).map(|g| snapshot_path(&base, 0, g)).collect();
        for path in &paths {
            assert!(PopulationSnapshot::load(path, &model).is_ok());
        }
        let resumed = PopulationSnapshot::load(&checkpoint, &model).unwrap();
        assert_eq!(resumed.population.individuals, out.individuals);

        let dot = std::fs::read_to_string(genealogy_path(&base)).unwrap();
        assert!(dot.starts_with("digraph genealogy {"));
        assert!(dot.trim_end().ends_with('}'));

        let genealogy = Genealogy::from_snapshots(&paths).unwrap();
        assert_eq!(genealogy.final_generation(), Some(3));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
