//! Core data structures for the Plastica simulation.

pub mod connection;
pub mod environment;
pub mod genome;
