//! # Plastica IO
//!
//! I/O and persistence layer for the Plastica simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON serialization with optional gzip compression
//! - Population snapshots for checkpoint/resume
//! - Trajectory and genealogy output

/// Error types and result aliases for I/O operations
pub mod error;
/// Streaming genealogy output and offline ancestry graphs
pub mod genealogy;
/// File-backed observer for the evolutionary loop
pub mod recorder;
/// Validated serialization helpers for JSON files
pub mod serialization;
/// Population snapshots checked against the running model
pub mod snapshot;
/// Per-generation trajectory table
pub mod trajectory;

pub use error::{IoError, Result};
pub use genealogy::{Genealogy, GenealogyWriter};
pub use recorder::{checkpoint_path, genealogy_path, FileRecorder};
pub use serialization::{from_json, read_json_file, to_json, write_json_file};
pub use snapshot::{snapshot_path, PopulationSnapshot};
pub use trajectory::{TrajectoryWriter, TRAJECTORY_HEADER};
