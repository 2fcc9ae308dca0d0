pub mod macros;

use plastica_core::config::{AppConfig, DensityConfig};
use plastica_core::{Model, Population};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[allow(dead_code)]
pub struct ModelBuilder {
    config: AppConfig,
    seed: u64,
}

#[allow(dead_code)]
impl ModelBuilder {
    /// A small model with every optional layer disabled and layers dense
    /// enough that founders differ in phenotype.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.density = DensityConfig::uniform(0.3);
        config.model.ngenes = 10;
        config.model.nenv = 4;
        config.model.ncells = 1;
        config.model.with_cue = false;
        config.model.with_epigenetic = false;
        config.model.with_higher_order = false;
        config.model.with_interaction = false;
        config.evolution.population_size = 20;
        Self { config, seed: 42 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.config.run.seed = Some(seed);
        self
    }

    pub fn with_all_layers(mut self) -> Self {
        self.config.model.with_cue = true;
        self.config.model.with_epigenetic = true;
        self.config.model.with_higher_order = true;
        self.config.model.with_interaction = true;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.config.density = DensityConfig::uniform(density);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn config(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn build(self) -> (Model, Population, ChaCha8Rng) {
        let model = Model::new(self.config).expect("Failed to create model in test builder");
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let population = Population::new_random(&model, &mut rng);
        (model, population, rng)
    }
}

/// A unique scratch path under the system temp directory.
#[allow(dead_code)]
pub fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("plastica_test_{}_{}", std::process::id(), name))
}
