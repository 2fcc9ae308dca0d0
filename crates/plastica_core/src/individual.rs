//! Individuals: a genome, its three developmental contexts and the
//! measurements derived from them.

use crate::config::DevelopmentConfig;
use crate::cue::{dist2, CuesLogic};
use crate::develop::{develop, sigma, Cell};
use crate::genome::crossover::genome_crossover_with_rng;
use crate::genome::{GenomeLayout, GenomeLogic, MutationEvent};
use crate::model::Model;
use crate::sparse::ConnectionLogic;
use plastica_data::{cross_variance, Cues, Genome};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Scalar measurements taken by [`Individual::compare_dev`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fitness of the novel-cue phenotype against the noisy novel target.
    pub fitness: f64,
    /// Fitness of the no-cue phenotype against the same target.
    pub baseline_fitness: f64,
    pub cue_plasticity: f64,
    pub observed_plasticity: f64,
    /// `fitness − baseline_fitness`.
    pub utility: f64,
    pub polyphenism: f64,
    /// Developments in this evaluation that hit the step cap.
    pub unconverged: usize,
}

/// Developed cells for each context, one cell per cell type.
#[derive(Clone, Debug, PartialEq)]
pub struct Contexts {
    pub no_cue: Vec<Cell>,
    pub ancestral: Vec<Cell>,
    pub novel: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub id: usize,
    pub father: Option<usize>,
    pub mother: Option<usize>,
    pub genome: Genome,
    /// Starting expression for development, inherited from the parents.
    pub initial_expression: Vec<f64>,
    /// Starting expression this individual hands to its offspring.
    pub offspring_seed: Vec<f64>,
    #[serde(skip)]
    pub contexts: Option<Contexts>,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
}

impl Individual {
    /// A founder with a random genome and unit initial expression.
    pub fn new_random<R: Rng>(id: usize, layout: &GenomeLayout, rng: &mut R) -> Self {
        let ngenes = layout.ngenes();
        Self {
            id,
            father: None,
            mother: None,
            genome: Genome::new_random_with_rng(layout, rng),
            initial_expression: vec![1.0; ngenes],
            offspring_seed: vec![1.0; ngenes],
            contexts: None,
            evaluation: None,
        }
    }

    #[must_use]
    pub fn is_developed(&self) -> bool {
        self.evaluation.is_some()
    }

    /// Fitness of the last evaluation, zero while undeveloped.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.evaluation.as_ref().map_or(0.0, |e| e.fitness)
    }

    fn develop_context<R: Rng>(
        &self,
        cues: &Cues,
        params: &DevelopmentConfig,
        rng: &mut R,
    ) -> Vec<Cell> {
        cues.with_noise(params.dev_noise, rng)
            .iter()
            .map(|cue| develop(&self.genome, &self.initial_expression, cue.as_slice(), params))
            .collect()
    }

    /// Develops the no-cue, ancestral and novel contexts and records the
    /// resulting [`Evaluation`]. Also refreshes [`Individual::offspring_seed`]
    /// from the novel-context expression.
    pub fn compare_dev<R: Rng>(&mut self, novel_env: &Cues, ancestral_env: &Cues, model: &Model, rng: &mut R) {
        let params = &model.config.development;
        let ncells = model.ncells();
        let nenv = model.nenv();

        let no_cue = self.develop_context(&Cues::zeros(ncells, nenv), params, rng);
        let ancestral = self.develop_context(ancestral_env, params, rng);
        let novel = self.develop_context(novel_env, params, rng);

        let target = novel_env.with_noise(params.env_noise, rng);
        let norm = (ncells * nenv) as f64;
        let s = model.config.evolution.selection_strength;
        let mismatch = |cells: &[Cell]| {
            cells
                .iter()
                .zip(target.iter())
                .map(|(c, t)| dist2(&c.phenotype, t.as_slice()))
                .sum::<f64>()
                / norm
        };
        let spread = |a: &[Cell], b: &[Cell]| {
            a.iter()
                .zip(b)
                .map(|(x, y)| dist2(&x.phenotype, &y.phenotype))
                .sum::<f64>()
        };

        let fitness = (-s * mismatch(&novel)).exp();
        let baseline_fitness = (-s * mismatch(&no_cue)).exp();

        let env_variance = novel_env.cross_cell_variance();
        let polyphenism = if env_variance > 0.0 {
            let phenotypes: Vec<&[f64]> = novel.iter().map(|c| c.phenotype.as_slice()).collect();
            cross_variance(&phenotypes) / env_variance
        } else {
            0.0
        };

        let unconverged = [&no_cue, &ancestral, &novel]
            .iter()
            .flat_map(|cells| cells.iter())
            .filter(|c| !c.converged)
            .count();

        let mut mean_expression = vec![0.0; model.ngenes()];
        for cell in &novel {
            for (m, x) in mean_expression.iter_mut().zip(&cell.expression) {
                *m += x / ncells as f64;
            }
        }
        self.genome
            .offspring_seed
            .multiply_transpose(&mut self.offspring_seed, &mean_expression);
        for x in &mut self.offspring_seed {
            *x = sigma(params.omega, *x);
        }

        self.evaluation = Some(Evaluation {
            fitness,
            baseline_fitness,
            cue_plasticity: spread(&novel, &no_cue) / norm,
            observed_plasticity: spread(&novel, &ancestral),
            utility: fitness - baseline_fitness,
            polyphenism,
            unconverged,
        });
        self.contexts = Some(Contexts {
            no_cue,
            ancestral,
            novel,
        });
    }

    /// One mutation event on the genome.
    pub fn mutate<R: Rng>(&mut self, layout: &GenomeLayout, rng: &mut R) -> Option<MutationEvent> {
        self.genome.mutate(layout, rng)
    }

    /// Two reciprocal offspring of `father` and `mother`, each mutated once.
    ///
    /// Children start undeveloped with id 0; the caller assigns ids.
    pub fn mate<R: Rng>(
        father: &Individual,
        mother: &Individual,
        layout: &GenomeLayout,
        rng: &mut R,
    ) -> (Individual, Individual) {
        let mut genome_a = father.genome.clone();
        let mut genome_b = mother.genome.clone();
        let mut seed_a = father.offspring_seed.clone();
        let mut seed_b = mother.offspring_seed.clone();
        genome_crossover_with_rng(&mut genome_a, &mut genome_b, &mut seed_a, &mut seed_b, rng);

        let child = |genome: Genome, seed: Vec<f64>| Individual {
            id: 0,
            father: Some(father.id),
            mother: Some(mother.id),
            genome,
            initial_expression: seed.clone(),
            offspring_seed: seed,
            contexts: None,
            evaluation: None,
        };
        let mut a = child(genome_a, seed_a);
        let mut b = child(genome_b, seed_b);
        a.mutate(layout, rng);
        b.mutate(layout, rng);
        (a, b)
    }
}
