//! Developmental dynamics: the capped fixed-point iteration mapping a genome,
//! an initial expression state and a cue to a cell phenotype.
//!
//! One step runs the stages below:
//!
//! 1. `u = F·g (+ E·cue)`, `g' = σ(u)`
//! 2. `h₁ = φ(G·g')` if the epigenetic layer exists, else `g'`
//! 3. `h₂ = φ(H·h₁ + J·(h₁ ∘ g'))` if the higher-order layer exists, else `h₁`
//! 4. `p = σ(Pᵀ·h₂)`
//!
//! The iteration stops when `‖g' − g‖² < eps_dev` or after `max_dev_step`
//! steps. `φ` is `σ` when the interaction layer is present and a rectifier
//! otherwise.

use crate::config::DevelopmentConfig;
use crate::cue::dist2;
use crate::sparse::ConnectionLogic;
use plastica_data::Genome;
use serde::{Deserialize, Serialize};

/// Developed state of one cell type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub expression: Vec<f64>,
    pub epigenetic: Vec<f64>,
    pub higher_order: Vec<f64>,
    pub phenotype: Vec<f64>,
    /// Iterations actually run.
    pub steps: usize,
    /// False when the step cap was reached first; the last state is kept.
    pub converged: bool,
}

/// Saturating nonlinearity with range (−1, 1) and slope `omega / 2` at zero.
#[inline]
#[must_use]
pub fn sigma(omega: f64, x: f64) -> f64 {
    2.0 / (1.0 + (-omega * x).exp()) - 1.0
}

#[inline]
#[must_use]
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn apply_sigma(omega: f64, v: &mut [f64]) {
    for x in v {
        *x = sigma(omega, *x);
    }
}

fn apply_relu(v: &mut [f64]) {
    for x in v {
        *x = relu(*x);
    }
}

fn add_into(acc: &mut [f64], v: &[f64]) {
    for (a, b) in acc.iter_mut().zip(v) {
        *a += b;
    }
}

/// Runs the developmental iteration from `initial` under `cue`.
///
/// `cue` is ignored when the genome has no cue layer. Non-convergence is
/// reported through [`Cell::converged`] rather than as an error.
#[must_use]
pub fn develop(genome: &Genome, initial: &[f64], cue: &[f64], params: &DevelopmentConfig) -> Cell {
    let ngenes = genome.gene_count();
    let nenv = genome.phenotype.cols;
    debug_assert_eq!(initial.len(), ngenes);

    let omega = params.omega;
    let interacting = genome.interaction.is_some();
    let squash = |v: &mut [f64]| {
        if interacting {
            apply_sigma(omega, v)
        } else {
            apply_relu(v)
        }
    };

    let mut g = initial.to_vec();
    let mut next = vec![0.0; ngenes];
    let mut buf = vec![0.0; ngenes];
    let mut paired = vec![0.0; ngenes];
    let mut epigenetic = vec![0.0; ngenes];
    let mut higher_order = vec![0.0; ngenes];
    let mut phenotype = vec![0.0; nenv];

    let mut steps = 0;
    let mut converged = false;
    while steps < params.max_dev_step {
        steps += 1;

        genome.regulatory.multiply(&mut next, &g);
        if let Some(e) = &genome.cue {
            e.multiply(&mut buf, cue);
            add_into(&mut next, &buf);
        }
        apply_sigma(omega, &mut next);

        match &genome.epigenetic {
            Some(layer) => {
                layer.multiply(&mut epigenetic, &next);
                squash(&mut epigenetic);
            }
            None => epigenetic.copy_from_slice(&next),
        }

        match &genome.higher_order {
            Some(layer) => {
                layer.multiply(&mut higher_order, &epigenetic);
                if let Some(j) = &genome.interaction {
                    for ((p, a), b) in paired.iter_mut().zip(&epigenetic).zip(&next) {
                        *p = a * b;
                    }
                    j.multiply(&mut buf, &paired);
                    add_into(&mut higher_order, &buf);
                }
                squash(&mut higher_order);
            }
            None => higher_order.copy_from_slice(&epigenetic),
        }

        genome.phenotype.multiply_transpose(&mut phenotype, &higher_order);
        apply_sigma(omega, &mut phenotype);

        let delta = dist2(&next, &g);
        std::mem::swap(&mut g, &mut next);
        if delta < params.eps_dev {
            converged = true;
            break;
        }
    }

    Cell {
        expression: g,
        epigenetic,
        higher_order,
        phenotype,
        steps,
        converged,
    }
}
