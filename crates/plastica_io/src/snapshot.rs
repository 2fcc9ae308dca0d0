//! Population snapshots for checkpoint/resume and offline analysis.

use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use plastica_core::{GenomeLogic, Model, Population};
use plastica_data::Cues;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One saved generation together with the model it was produced under.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PopulationSnapshot {
    pub config_fingerprint: String,
    pub epoch: usize,
    pub population: Population,
}

/// `{base}_{epoch:02}_{generation:03}.json`
#[must_use]
pub fn snapshot_path(base: &str, epoch: usize, generation: usize) -> PathBuf {
    PathBuf::from(format!("{}_{:02}_{:03}.json", base, epoch, generation))
}

impl PopulationSnapshot {
    #[must_use]
    pub fn capture(model: &Model, epoch: usize, population: &Population) -> Self {
        Self {
            config_fingerprint: model.fingerprint(),
            epoch,
            population: population.clone(),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json_file(self, path)
    }

    /// Reads a snapshot without checking it against any model.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json_file(path)
    }

    /// Reads a snapshot and checks that it fits `model`.
    pub fn load<P: AsRef<Path>>(path: P, model: &Model) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Self::read(path)?;
        snapshot
            .validate(model)
            .map_err(|e| e.with_context(format!("loading {:?}", path)))?;
        Ok(snapshot)
    }

    /// Checks the fingerprint, the environment shape and every individual's
    /// genome against `model`.
    pub fn validate(&self, model: &Model) -> Result<()> {
        let expected = model.fingerprint();
        if self.config_fingerprint != expected {
            return Err(IoError::ConfigMismatch {
                expected,
                found: self.config_fingerprint.clone(),
            });
        }

        let pop = &self.population;
        check_cues("novel_env", &pop.novel_env, model)?;
        check_cues("ancestral_env", &pop.ancestral_env, model)?;

        let ngenes = model.ngenes();
        for (position, individual) in pop.individuals.iter().enumerate() {
            if individual.id != position {
                return Err(IoError::validation(format!(
                    "individual at position {} has id {}",
                    position, individual.id
                )));
            }
            if !individual.genome.matches_layout(&model.layout) {
                return Err(IoError::validation(format!(
                    "genome of individual {} does not match the layer layout",
                    individual.id
                )));
            }
            if individual.initial_expression.len() != ngenes
                || individual.offspring_seed.len() != ngenes
            {
                return Err(IoError::validation(format!(
                    "expression vectors of individual {} are not {} long",
                    individual.id, ngenes
                )));
            }
        }
        Ok(())
    }
}

impl PopulationSnapshot {
    /// Checks that the population is a reproduced, undeveloped generation
    /// such as a checkpoint. Per-generation snapshots hold developed
    /// individuals whose children were never produced, so a run cannot
    /// continue from them.
    pub fn ensure_resumable(&self) -> Result<()> {
        if let Some(developed) = self.population.individuals.iter().find(|i| i.is_developed()) {
            return Err(IoError::validation(format!(
                "generation {} is already developed (individual {}); resume from a checkpoint",
                self.population.generation, developed.id
            )));
        }
        Ok(())
    }
}

fn check_cues(name: &str, cues: &Cues, model: &Model) -> Result<()> {
    if cues.cell_count() != model.ncells() || cues.dimension() != Some(model.nenv()) {
        return Err(IoError::validation(format!(
            "{} should hold {} cues of length {}",
            name,
            model.ncells(),
            model.nenv()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::{from_json, to_json};
    use plastica_core::config::{AppConfig, DensityConfig, ModelConfig};
    use plastica_data::Cue;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model(ngenes: usize) -> Model {
        let mut config = AppConfig {
            model: ModelConfig {
                ngenes,
                nenv: 3,
                ncells: 2,
                ..Default::default()
            },
            density: DensityConfig::uniform(0.5),
            ..Default::default()
        };
        config.evolution.population_size = 4;
        Model::new(config).unwrap()
    }

    fn developed(m: &Model) -> Population {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let pop = Population::new_random(m, &mut rng);
        pop.develop_all(1, m, &mut rng).0
    }

    #[test]
    fn test_snapshot_path_format() {
        assert_eq!(snapshot_path("out/run", 3, 17), PathBuf::from("out/run_03_017.json"));
    }

    #[test]
    fn test_snapshot_json_is_byte_stable() {
        let m = model(6);
        let snapshot = PopulationSnapshot::capture(&m, 0, &developed(&m));
        let json = to_json(&snapshot).unwrap();
        let back: PopulationSnapshot = from_json(&json).unwrap();
        assert_eq!(to_json(&back).unwrap(), json);
        assert_eq!(back.population.individuals[0].genome, snapshot.population.individuals[0].genome);
        assert!(back.population.individuals[0].contexts.is_none());
    }

    #[test]
    fn test_validate_accepts_own_model() {
        let m = model(6);
        let snapshot = PopulationSnapshot::capture(&m, 1, &developed(&m));
        assert!(snapshot.validate(&m).is_ok());
    }

    #[test]
    fn test_validate_rejects_other_config() {
        let m = model(6);
        let snapshot = PopulationSnapshot::capture(&m, 1, &developed(&m));
        let err = snapshot.validate(&model(7)).unwrap_err();
        assert!(matches!(err, IoError::ConfigMismatch { .. }));
    }

    #[test]
    fn test_validate_rejects_ragged_environment() {
        let m = model(6);
        let mut snapshot = PopulationSnapshot::capture(&m, 1, &developed(&m));
        snapshot.population.novel_env.0[1] = Cue(vec![1.0]);
        assert!(matches!(snapshot.validate(&m), Err(IoError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_misshapen_genome() {
        let m = model(6);
        let mut snapshot = PopulationSnapshot::capture(&m, 1, &developed(&m));
        snapshot.population.individuals[2].genome.phenotype.cols = 5;
        assert!(matches!(snapshot.validate(&m), Err(IoError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_shuffled_ids() {
        let m = model(6);
        let mut snapshot = PopulationSnapshot::capture(&m, 1, &developed(&m));
        snapshot.population.individuals.swap(0, 1);
        assert!(snapshot.validate(&m).is_err());
    }

    #[test]
    fn test_only_undeveloped_generations_are_resumable() {
        let m = model(6);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pop = developed(&m);
        let developed_snapshot = PopulationSnapshot::capture(&m, 0, &pop);
        assert!(matches!(
            developed_snapshot.ensure_resumable(),
            Err(IoError::Validation(_))
        ));

        let mut fit = pop.clone();
        for individual in &mut fit.individuals {
            if let Some(e) = individual.evaluation.as_mut() {
                e.fitness = 1.0;
            }
        }
        let next = fit.reproduce(4, &m.layout, &mut rng).population;
        assert!(PopulationSnapshot::capture(&m, 0, &next).ensure_resumable().is_ok());
    }
}
