//! Plastica: evolution of gene-regulatory networks under changing
//! environments.
//!
//! The engine lives in `plastica_core`, persistence in `plastica_io`; this
//! crate holds the command-line driver.

pub mod app;
