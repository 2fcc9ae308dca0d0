use super::Population;
use crate::genome::GenomeLogic;
use crate::individual::Evaluation;
use plastica_data::{cross_variance, Genome};
use serde::{Deserialize, Serialize};

/// Population summary for one developed generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRow {
    pub epoch: usize,
    pub generation: usize,
    pub mean_fitness: f64,
    pub mean_cue_plasticity: f64,
    pub mean_observed_plasticity: f64,
    pub mean_polyphenism: f64,
    pub diversity: f64,
    pub mean_utility: f64,
}

impl Population {
    /// Mean of `f` over developed individuals; zero if there are none.
    fn mean_of(&self, f: impl Fn(&Evaluation) -> f64) -> f64 {
        let (sum, n) = self
            .individuals
            .iter()
            .filter_map(|i| i.evaluation.as_ref())
            .fold((0.0, 0usize), |(sum, n), e| (sum + f(e), n + 1));
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    #[must_use]
    pub fn mean_fitness(&self) -> f64 {
        self.mean_of(|e| e.fitness)
    }

    #[must_use]
    pub fn mean_cue_plasticity(&self) -> f64 {
        self.mean_of(|e| e.cue_plasticity)
    }

    #[must_use]
    pub fn mean_observed_plasticity(&self) -> f64 {
        self.mean_of(|e| e.observed_plasticity)
    }

    #[must_use]
    pub fn mean_polyphenism(&self) -> f64 {
        self.mean_of(|e| e.polyphenism)
    }

    #[must_use]
    pub fn mean_utility(&self) -> f64 {
        self.mean_of(|e| e.utility)
    }

    /// Total variance of novel-context phenotypes, pooled over individuals
    /// and cell types. Only individuals developed in this process count.
    #[must_use]
    pub fn diversity(&self) -> f64 {
        let phenotypes: Vec<&[f64]> = self
            .individuals
            .iter()
            .filter_map(|i| i.contexts.as_ref())
            .flat_map(|c| c.novel.iter())
            .map(|cell| cell.phenotype.as_slice())
            .collect();
        cross_variance(&phenotypes)
    }

    /// Entrywise mean genome, or `None` for an empty population.
    #[must_use]
    pub fn mean_genome(&self) -> Option<Genome> {
        let (first, rest) = self.individuals.split_first()?;
        let mut mean = first.genome.clone();
        for individual in rest {
            mean.accumulate(&individual.genome);
        }
        mean.scale(1.0 / self.individuals.len() as f64);
        Some(mean)
    }

    #[must_use]
    pub fn trajectory_row(&self, epoch: usize) -> TrajectoryRow {
        TrajectoryRow {
            epoch,
            generation: self.generation,
            mean_fitness: self.mean_fitness(),
            mean_cue_plasticity: self.mean_cue_plasticity(),
            mean_observed_plasticity: self.mean_observed_plasticity(),
            mean_polyphenism: self.mean_polyphenism(),
            diversity: self.diversity(),
            mean_utility: self.mean_utility(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DensityConfig, ModelConfig};
    use crate::model::Model;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model() -> Model {
        let mut config = AppConfig {
            model: ModelConfig {
                ngenes: 6,
                nenv: 3,
                ncells: 2,
                ..Default::default()
            },
            density: DensityConfig::uniform(0.5),
            ..Default::default()
        };
        config.evolution.population_size = 6;
        Model::new(config).unwrap()
    }

    #[test]
    fn test_means_skip_undeveloped_individuals() {
        let m = model();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pop = Population::new_random(&m, &mut rng);
        assert_eq!(pop.mean_fitness(), 0.0);
        pop.individuals[0].evaluation = Some(Evaluation {
            fitness: 0.2,
            utility: -0.1,
            ..Default::default()
        });
        pop.individuals[1].evaluation = Some(Evaluation {
            fitness: 0.6,
            utility: 0.3,
            ..Default::default()
        });
        assert!((pop.mean_fitness() - 0.4).abs() < 1e-12);
        assert!((pop.mean_utility() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_diversity_of_developed_population() {
        let m = model();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let pop = Population::new_random(&m, &mut rng);
        assert_eq!(pop.diversity(), 0.0);
        let (developed, _) = pop.develop_all(1, &m, &mut rng);
        assert!(developed.diversity() > 0.0);

        let row = developed.trajectory_row(3);
        assert_eq!(row.epoch, 3);
        assert_eq!(row.generation, 1);
        assert_eq!(row.mean_fitness, developed.mean_fitness());
    }

    #[test]
    fn test_mean_genome_of_clones_is_the_genome() {
        let m = model();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pop = Population::new_random(&m, &mut rng);
        let genome = pop.individuals[0].genome.clone();
        for ind in &mut pop.individuals {
            ind.genome = genome.clone();
        }
        let mean = pop.mean_genome().unwrap();
        assert!(Genome::diff(&mean, &genome).frobenius_norm() < 1e-12);

        pop.individuals.clear();
        assert!(pop.mean_genome().is_none());
    }
}
