//! # Plastica Core
//!
//! The simulation engine for Plastica - evolution of gene-regulatory networks
//! that build multicellular phenotypes under changing environmental cues.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Sparse regulatory layers and the genetic operators on genomes
//! - Developmental fixed-point dynamics
//! - Fitness, plasticity and polyphenism measurements per individual
//! - Fitness-weighted reproduction and the epoch/generation loop
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! - **Plain data, logic traits**: records live in `plastica_data`; behaviour
//!   is attached here through `ConnectionLogic`, `GenomeLogic` and `CueLogic`
//! - **Parallel development**: Rayon fans out one task per individual
//! - **Deterministic simulation**: Seeded RNG for reproducible results
//!
//! ## Example
//!
//! ```
//! use plastica_core::config::AppConfig;
//! use plastica_core::metrics::Metrics;
//! use plastica_core::population::{Population, TrajectoryRow};
//! use plastica_core::{run_epochs, Model};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut config = AppConfig::default();
//! config.model.ngenes = 8;
//! config.model.nenv = 4;
//! config.evolution.population_size = 10;
//! config.run.generations_per_epoch = 2;
//! let model = Model::new(config).unwrap();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let population = Population::new_random(&model, &mut rng);
//! let mut rows: Vec<TrajectoryRow> = Vec::new();
//! run_epochs(population, &model, 0, 1, &mut rng, &mut rows, &Metrics::new()).unwrap();
//! assert_eq!(rows.len(), 2);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Environmental cue generation, noise and change
pub mod cue;
/// Developmental fixed-point dynamics
pub mod develop;
/// Genome layout and genetic operators
pub mod genome;
/// Individuals and their developmental measurements
pub mod individual;
/// Performance metrics collection and logging
pub mod metrics;
/// Validated configuration with its derived genome layout
pub mod model;
/// Per-generation output hooks
pub mod observer;
/// Populations, reproduction and the evolutionary loop
pub mod population;
/// Sparse connection algebra
pub mod sparse;

pub use cue::{CueLogic, CuesLogic};
pub use develop::{develop, Cell};
pub use genome::{GenomeLayout, GenomeLogic};
pub use individual::{Evaluation, Individual};
pub use metrics::{init_logging, Metrics};
pub use model::Model;
pub use observer::EvolutionObserver;
pub use plastica_data::{Cue, Cues, Genome, LayerKind, SparseConnection};
pub use population::{run_epochs, DevelopmentReport, EvolveOptions, Population, TrajectoryRow};
pub use sparse::ConnectionLogic;
