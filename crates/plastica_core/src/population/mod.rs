//! Populations and the generational loop.
//!
//! Generations do not overlap: development consumes a population and returns
//! its developed copy, and reproduction builds a fresh one from it.

pub mod reproduce;
pub mod stats;

pub use reproduce::Reproduction;
pub use stats::TrajectoryRow;

use crate::cue::CuesLogic;
use crate::individual::Individual;
use crate::metrics::Metrics;
use crate::model::Model;
use crate::observer::EvolutionObserver;
use plastica_data::Cues;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub generation: usize,
    pub novel_env: Cues,
    pub ancestral_env: Cues,
    pub individuals: Vec<Individual>,
}

/// Outcome of one development barrier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DevelopmentReport {
    pub developments: usize,
    pub unconverged: usize,
}

/// Settings for one call to [`Population::evolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvolveOptions {
    pub epoch: usize,
    pub generations: usize,
    /// Hand every developed generation to the observer.
    pub test_mode: bool,
}

impl Population {
    /// Founders with random genomes in a random environment. The ancestral
    /// environment starts equal to the novel one.
    pub fn new_random<R: Rng>(model: &Model, rng: &mut R) -> Self {
        let novel_env = Cues::random(model.ncells(), model.nenv(), rng);
        let individuals = (0..model.config.evolution.population_size)
            .map(|id| Individual::new_random(id, &model.layout, rng))
            .collect();
        Self {
            generation: 0,
            ancestral_env: novel_env.clone(),
            novel_env,
            individuals,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Develops every individual in parallel and stamps `generation`.
    ///
    /// Task seeds are drawn from `rng` in individual order before the
    /// fan-out, so the result depends only on `rng`'s state.
    pub fn develop_all<R: Rng>(
        self,
        generation: usize,
        model: &Model,
        rng: &mut R,
    ) -> (Self, DevelopmentReport) {
        let Population {
            novel_env,
            ancestral_env,
            individuals,
            ..
        } = self;
        let seeds: Vec<u64> = individuals.iter().map(|_| rng.gen()).collect();

        let novel = &novel_env;
        let ancestral = &ancestral_env;
        let individuals: Vec<Individual> = individuals
            .into_par_iter()
            .zip(seeds)
            .map(|(mut individual, seed)| {
                let mut task_rng = ChaCha8Rng::seed_from_u64(seed);
                individual.compare_dev(novel, ancestral, model, &mut task_rng);
                individual
            })
            .collect();

        let report = DevelopmentReport {
            developments: individuals.len() * 3 * model.ncells(),
            unconverged: individuals
                .iter()
                .filter_map(|i| i.evaluation.as_ref())
                .map(|e| e.unconverged)
                .sum(),
        };
        let developed = Population {
            generation,
            novel_env,
            ancestral_env,
            individuals,
        };
        (developed, report)
    }

    /// Starts a new epoch: the novel cues become ancestral and a fraction
    /// `denv` of each cell's cue components is flipped.
    pub fn with_new_environment<R: Rng>(self, denv: f64, rng: &mut R) -> Self {
        let novel_env = self.novel_env.changed(denv, rng);
        Self {
            ancestral_env: self.novel_env,
            novel_env,
            ..self
        }
    }

    /// Runs `options.generations` rounds of development and reproduction.
    ///
    /// Generations are numbered on from `self.generation`. Returns the last
    /// reproduced population, undeveloped.
    pub fn evolve<R: Rng, O: EvolutionObserver + ?Sized>(
        self,
        model: &Model,
        rng: &mut R,
        observer: &mut O,
        options: EvolveOptions,
        metrics: &Metrics,
    ) -> anyhow::Result<Population> {
        let target = model.config.evolution.population_size;
        let mut population = self;
        for _ in 0..options.generations {
            let generation = population.generation + 1;
            let (developed, report) = population.develop_all(generation, model, rng);

            if options.test_mode {
                observer.on_generation(options.epoch, &developed)?;
            }
            let row = developed.trajectory_row(options.epoch);
            observer.on_trajectory(&row)?;
            metrics.record_generation(generation, &report, row.mean_fitness);

            let next = developed.reproduce(target, &model.layout, rng);
            metrics.record_shortfall(next.short_by);
            population = next.population;
        }
        Ok(population)
    }
}

/// Runs `epochs` consecutive epochs starting at `first_epoch`.
///
/// Every epoch except a fresh run's first begins with an environment change.
pub fn run_epochs<R: Rng, O: EvolutionObserver + ?Sized>(
    mut population: Population,
    model: &Model,
    first_epoch: usize,
    epochs: usize,
    rng: &mut R,
    observer: &mut O,
    metrics: &Metrics,
) -> anyhow::Result<Population> {
    let run = &model.config.run;
    for epoch in first_epoch..first_epoch + epochs {
        if epoch > 0 {
            population = population.with_new_environment(model.config.evolution.env_change, rng);
        }
        tracing::info!(
            epoch = epoch,
            generation = population.generation,
            individuals = population.len(),
            "Starting epoch"
        );
        population = population.evolve(
            model,
            rng,
            observer,
            EvolveOptions {
                epoch,
                generations: run.generations_per_epoch,
                test_mode: run.test_mode,
            },
            metrics,
        )?;
    }
    Ok(population)
}
