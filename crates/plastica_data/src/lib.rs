//! # Plastica Data
//!
//! Plain, serializable records shared by the simulation engine and the
//! persistence layer. Behaviour lives in `plastica_core` as extension traits.

pub mod data;

pub use data::connection::SparseConnection;
pub use data::environment::{cross_variance, Cue, Cues};
pub use data::genome::{Genome, LayerKind};
