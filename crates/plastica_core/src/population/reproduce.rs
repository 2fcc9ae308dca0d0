use super::Population;
use crate::genome::GenomeLayout;
use crate::individual::Individual;
use rand::Rng;

/// Pairing attempts allowed per requested child.
pub const ATTEMPTS_PER_CHILD: usize = 1000;

/// The next generation and how hard it was to produce.
#[derive(Clone, Debug)]
pub struct Reproduction {
    pub population: Population,
    pub attempts: usize,
    /// Requested children that could not be produced within the attempt cap.
    pub short_by: usize,
}

impl Population {
    /// Builds the next generation by fitness-weighted pairing.
    ///
    /// Each attempt draws two parents uniformly with replacement and accepts
    /// the pair when both pass an independent fitness test, so acceptance
    /// happens with probability `f₁·f₂` (fitness clamped to `[0, 1]`). An
    /// accepted pair yields two mutated children. Gives up after
    /// [`ATTEMPTS_PER_CHILD`]` × target` attempts and returns what it has.
    ///
    /// Children are numbered `0..n` and undeveloped; the environment is
    /// carried over.
    pub fn reproduce<R: Rng>(&self, target: usize, layout: &GenomeLayout, rng: &mut R) -> Reproduction {
        let n = self.individuals.len();
        let max_attempts = ATTEMPTS_PER_CHILD * target;
        let mut children: Vec<Individual> = Vec::with_capacity(target + 1);
        let mut attempts = 0;

        while n > 0 && children.len() < target && attempts < max_attempts {
            attempts += 1;
            let father = &self.individuals[rng.gen_range(0..n)];
            let mother = &self.individuals[rng.gen_range(0..n)];
            let father_ok = rng.gen::<f64>() < father.fitness().clamp(0.0, 1.0);
            let mother_ok = rng.gen::<f64>() < mother.fitness().clamp(0.0, 1.0);
            if !(father_ok && mother_ok) {
                continue;
            }
            let (a, b) = Individual::mate(father, mother, layout, rng);
            children.push(a);
            children.push(b);
        }

        children.truncate(target);
        for (id, child) in children.iter_mut().enumerate() {
            child.id = id;
        }

        let short_by = target - children.len();
        if short_by > 0 {
            tracing::warn!(
                generation = self.generation,
                target = target,
                produced = children.len(),
                attempts = attempts,
                "Reproduction fell short of target size"
            );
        }

        Reproduction {
            population: Population {
                generation: self.generation,
                novel_env: self.novel_env.clone(),
                ancestral_env: self.ancestral_env.clone(),
                individuals: children,
            },
            attempts,
            short_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DensityConfig, ModelConfig};
    use crate::individual::Evaluation;
    use crate::model::Model;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn population(fitness: f64, rng: &mut ChaCha8Rng) -> (Model, Population) {
        let mut config = AppConfig {
            model: ModelConfig {
                ngenes: 6,
                nenv: 3,
                ..Default::default()
            },
            density: DensityConfig::uniform(0.5),
            ..Default::default()
        };
        config.evolution.population_size = 8;
        let model = Model::new(config).unwrap();
        let mut pop = Population::new_random(&model, rng);
        pop.generation = 4;
        for ind in &mut pop.individuals {
            ind.evaluation = Some(Evaluation {
                fitness,
                ..Default::default()
            });
        }
        (model, pop)
    }

    #[test]
    fn test_full_fitness_fills_target_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (model, pop) = population(1.0, &mut rng);
        for target in [8, 7, 1] {
            let out = pop.reproduce(target, &model.layout, &mut rng);
            assert_eq!(out.short_by, 0);
            assert_eq!(out.population.len(), target);
            assert_eq!(out.attempts, target.div_ceil(2));
            let ids: Vec<usize> = out.population.individuals.iter().map(|i| i.id).collect();
            assert_eq!(ids, (0..target).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_children_are_reset_and_environment_carried() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (model, pop) = population(1.0, &mut rng);
        let out = pop.reproduce(8, &model.layout, &mut rng).population;
        assert_eq!(out.generation, pop.generation);
        assert_eq!(out.novel_env, pop.novel_env);
        assert_eq!(out.ancestral_env, pop.ancestral_env);
        for child in &out.individuals {
            assert!(!child.is_developed());
            assert!(child.father.unwrap() < 8 && child.mother.unwrap() < 8);
        }
    }

    #[test]
    fn test_zero_fitness_gives_up_after_attempt_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (model, pop) = population(0.0, &mut rng);
        let out = pop.reproduce(5, &model.layout, &mut rng);
        assert_eq!(out.attempts, 5 * ATTEMPTS_PER_CHILD);
        assert_eq!(out.short_by, 5);
        assert!(out.population.is_empty());
    }

    #[test]
    fn test_fitness_above_one_is_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (model, pop) = population(3.5, &mut rng);
        let out = pop.reproduce(6, &model.layout, &mut rng);
        assert_eq!(out.attempts, 3);
    }

    #[test]
    fn test_parents_are_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (model, pop) = population(1.0, &mut rng);
        let before = pop.clone();
        let _ = pop.reproduce(8, &model.layout, &mut rng);
        assert_eq!(pop, before);
    }
}
