//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures mapping to a `config.toml` file.
//! A configuration is loaded once per run, validated, and then only read:
//! genome dimensions and layer flags never change after the first genome has
//! been allocated against them.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [model]
//! ngenes = 200
//! nenv = 200
//! ncells = 1
//! with_cue = true
//!
//! [evolution]
//! population_size = 200
//! selection_strength = 1.0
//!
//! [run]
//! epochs = 10
//! generations_per_epoch = 200
//! seed = 42
//! ```

use plastica_data::LayerKind;
use serde::{Deserialize, Serialize};

/// Genome dimensions and which optional layers exist.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of genes (rows of every layer).
    pub ngenes: usize,
    /// Environment (cue and phenotype) dimension.
    pub nenv: usize,
    /// Number of cell types per individual.
    pub ncells: usize,
    pub with_cue: bool,
    pub with_epigenetic: bool,
    pub with_higher_order: bool,
    /// Pairwise interaction term inside the higher-order stage.
    pub with_interaction: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ngenes: 200,
            nenv: 200,
            ncells: 1,
            with_cue: true,
            with_epigenetic: true,
            with_higher_order: true,
            with_interaction: true,
        }
    }
}

impl ModelConfig {
    /// Whether `kind` is materialized under this configuration.
    #[must_use]
    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Cue => self.with_cue,
            LayerKind::Epigenetic => self.with_epigenetic,
            LayerKind::HigherOrder => self.with_higher_order,
            LayerKind::Interaction => self.with_interaction,
            LayerKind::Regulatory | LayerKind::Phenotype | LayerKind::OffspringSeed => true,
        }
    }

    /// Column count of `kind`, whether or not it is enabled.
    #[must_use]
    pub fn layer_width(&self, kind: LayerKind) -> usize {
        match kind {
            LayerKind::Cue | LayerKind::Phenotype => self.nenv,
            _ => self.ngenes,
        }
    }
}

/// Expected fraction of present entries, per layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DensityConfig {
    pub cue: f64,
    pub regulatory: f64,
    pub epigenetic: f64,
    pub higher_order: f64,
    pub interaction: f64,
    pub phenotype: f64,
    pub offspring_seed: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            cue: 0.02,
            regulatory: 0.02,
            epigenetic: 0.02,
            higher_order: 0.02,
            interaction: 0.02,
            phenotype: 0.02,
            offspring_seed: 0.02,
        }
    }
}

impl DensityConfig {
    #[must_use]
    pub fn for_layer(&self, kind: LayerKind) -> f64 {
        match kind {
            LayerKind::Cue => self.cue,
            LayerKind::Regulatory => self.regulatory,
            LayerKind::Epigenetic => self.epigenetic,
            LayerKind::HigherOrder => self.higher_order,
            LayerKind::Interaction => self.interaction,
            LayerKind::Phenotype => self.phenotype,
            LayerKind::OffspringSeed => self.offspring_seed,
        }
    }

    /// Uniform density for every layer.
    #[must_use]
    pub fn uniform(density: f64) -> Self {
        Self {
            cue: density,
            regulatory: density,
            epigenetic: density,
            higher_order: density,
            interaction: density,
            phenotype: density,
            offspring_seed: density,
        }
    }
}

/// Parameters of the developmental fixed-point iteration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DevelopmentConfig {
    /// Sharpness of the saturating nonlinearity.
    pub omega: f64,
    pub max_dev_step: usize,
    /// Squared-distance threshold for convergence.
    pub eps_dev: f64,
    /// Per-component sign-flip probability applied to developmental cues.
    pub dev_noise: f64,
    /// Per-component sign-flip probability applied to the selective target.
    pub env_noise: f64,
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        Self {
            omega: 1.0,
            max_dev_step: 200,
            eps_dev: 1.0e-20,
            dev_noise: 0.05,
            env_noise: 0.05,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub selection_strength: f64,
    /// Base mutation rate before compensation for the enabled layer width.
    pub mutation_rate: f64,
    /// Fraction of cue components flipped at each epoch boundary.
    pub env_change: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            selection_strength: 1.0,
            mutation_rate: 0.005,
            env_change: 0.5,
        }
    }
}

/// Run control. Not part of the model fingerprint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub epochs: usize,
    pub generations_per_epoch: usize,
    pub seed: Option<u64>,
    /// Write a snapshot and genealogy record for every generation.
    pub test_mode: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            generations_per_epoch: 200,
            seed: None,
            test_mode: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub density: DensityConfig,
    pub development: DevelopmentConfig,
    pub evolution: EvolutionConfig,
    pub run: RunConfig,
}

fn is_probability(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        let m = &self.model;
        anyhow::ensure!(m.ngenes > 0, "Gene count must be positive");
        anyhow::ensure!(m.nenv > 0, "Environment dimension must be positive");
        anyhow::ensure!(m.ncells > 0, "Cell-type count must be positive");
        anyhow::ensure!(
            !m.with_interaction || m.with_higher_order,
            "Interaction layer requires the higher-order layer"
        );

        for kind in LayerKind::ALL {
            anyhow::ensure!(
                is_probability(self.density.for_layer(kind)),
                "Density of layer {} must be in [0.0, 1.0]",
                kind
            );
        }

        let d = &self.development;
        anyhow::ensure!(
            d.omega > 0.0 && d.omega.is_finite(),
            "Omega must be positive"
        );
        anyhow::ensure!(d.max_dev_step > 0, "Max developmental steps must be positive");
        anyhow::ensure!(d.eps_dev > 0.0, "Convergence epsilon must be positive");
        anyhow::ensure!(
            is_probability(d.dev_noise),
            "Developmental noise must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            is_probability(d.env_noise),
            "Environmental noise must be in [0.0, 1.0]"
        );

        let e = &self.evolution;
        anyhow::ensure!(
            e.population_size >= 2,
            "Population size must be at least 2"
        );
        anyhow::ensure!(
            e.selection_strength >= 0.0,
            "Selection strength must be non-negative"
        );
        anyhow::ensure!(
            is_probability(e.mutation_rate),
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            is_probability(e.env_change),
            "Environment change must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.run.generations_per_epoch > 0,
            "Generations per epoch must be positive"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of everything that shapes genomes and their evaluation.
    ///
    /// Stored in snapshots so a resumed run can refuse an incompatible model.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.model).as_bytes());
        hasher.update(format!("{:?}", self.density).as_bytes());
        hasher.update(format!("{:?}", self.development).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hex::encode(hasher.finalize())
    }
}
