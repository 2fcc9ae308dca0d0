pub mod crossover;
pub mod layout;

pub use layout::{GenomeLayout, LayerSlot};
pub use plastica_data::{Genome, LayerKind, SparseConnection};

use crate::sparse::ConnectionLogic;
use rand::Rng;

/// Which layer a mutation call touched, and how many entry picks it made.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MutationEvent {
    pub layer: LayerKind,
    pub attempts: usize,
}

/// Trait defining the genetic operators on a regulatory [`Genome`].
pub trait GenomeLogic: Sized {
    /// A genome with every enabled layer allocated and empty.
    fn empty(layout: &GenomeLayout) -> Self;
    fn new_random_with_rng<R: Rng>(layout: &GenomeLayout, rng: &mut R) -> Self;
    /// Refills every enabled layer at its own density.
    fn randomize<R: Rng>(&mut self, layout: &GenomeLayout, rng: &mut R);
    fn clear(&mut self);
    /// Layer-wise `a − b`; layers missing from either side stay absent.
    fn diff(a: &Self, b: &Self) -> Self;
    fn scale(&mut self, c: f64);
    /// Layer-wise `self += other`.
    fn accumulate(&mut self, other: &Self);
    /// Frobenius norm over all present layers combined.
    fn frobenius_norm(&self) -> f64;
    /// Copy with unit Frobenius norm; an all-zero genome is copied unscaled.
    fn normalize(&self) -> Self;
    /// Dense concatenation of present layers in canonical order.
    fn flatten_to_vector(&self) -> Vec<f64>;
    /// Applies one mutation event to exactly one layer.
    fn mutate<R: Rng>(&mut self, layout: &GenomeLayout, rng: &mut R) -> Option<MutationEvent>;
    /// Whether present layers and their shapes agree with `layout`.
    fn matches_layout(&self, layout: &GenomeLayout) -> bool;
}

impl GenomeLogic for Genome {
    fn empty(layout: &GenomeLayout) -> Self {
        let alloc = |kind: LayerKind| {
            layout
                .slot(kind)
                .map(|s| SparseConnection::new(s.rows, s.width))
        };
        let ngenes = layout.ngenes();
        let nenv = layout.nenv();
        Genome {
            cue: alloc(LayerKind::Cue),
            regulatory: SparseConnection::new(ngenes, ngenes),
            epigenetic: alloc(LayerKind::Epigenetic),
            higher_order: alloc(LayerKind::HigherOrder),
            interaction: alloc(LayerKind::Interaction),
            phenotype: SparseConnection::new(ngenes, nenv),
            offspring_seed: SparseConnection::new(ngenes, ngenes),
        }
    }

    fn new_random_with_rng<R: Rng>(layout: &GenomeLayout, rng: &mut R) -> Self {
        let mut genome = Self::empty(layout);
        genome.randomize(layout, rng);
        genome
    }

    fn randomize<R: Rng>(&mut self, layout: &GenomeLayout, rng: &mut R) {
        for slot in layout.slots() {
            if let Some(layer) = self.layer_mut(slot.kind) {
                layer.randomize(slot.density, rng);
            }
        }
    }

    fn clear(&mut self) {
        for (_, layer) in self.layers_mut() {
            layer.clear();
        }
    }

    fn diff(a: &Self, b: &Self) -> Self {
        let pair = |x: Option<&SparseConnection>, y: Option<&SparseConnection>| match (x, y) {
            (Some(x), Some(y)) => Some(SparseConnection::diff(x, y)),
            _ => None,
        };
        Genome {
            cue: pair(a.cue.as_ref(), b.cue.as_ref()),
            regulatory: SparseConnection::diff(&a.regulatory, &b.regulatory),
            epigenetic: pair(a.epigenetic.as_ref(), b.epigenetic.as_ref()),
            higher_order: pair(a.higher_order.as_ref(), b.higher_order.as_ref()),
            interaction: pair(a.interaction.as_ref(), b.interaction.as_ref()),
            phenotype: SparseConnection::diff(&a.phenotype, &b.phenotype),
            offspring_seed: SparseConnection::diff(&a.offspring_seed, &b.offspring_seed),
        }
    }

    fn scale(&mut self, c: f64) {
        for (_, layer) in self.layers_mut() {
            layer.scale(c);
        }
    }

    fn accumulate(&mut self, other: &Self) {
        for (kind, layer) in self.layers_mut() {
            if let Some(src) = other.layer(kind) {
                layer.accumulate(src);
            }
        }
    }

    fn frobenius_norm(&self) -> f64 {
        self.layers()
            .map(|(_, l)| l.frobenius_sq())
            .sum::<f64>()
            .sqrt()
    }

    fn normalize(&self) -> Self {
        let mut out = self.clone();
        let norm = self.frobenius_norm();
        if norm > 0.0 {
            out.scale(1.0 / norm);
        }
        out
    }

    fn flatten_to_vector(&self) -> Vec<f64> {
        self.layers().flat_map(|(_, l)| l.flatten()).collect()
    }

    fn mutate<R: Rng>(&mut self, layout: &GenomeLayout, rng: &mut R) -> Option<MutationEvent> {
        if layout.effective_width() == 0 {
            return None;
        }
        let index = rng.gen_range(0..layout.effective_width());
        let slot = *layout.slot_for_index(index)?;
        let layer = self.layer_mut(slot.kind)?;
        let attempts = layer.mutate(slot.density, layout.mutation_rate(), rng);
        Some(MutationEvent {
            layer: slot.kind,
            attempts,
        })
    }

    fn matches_layout(&self, layout: &GenomeLayout) -> bool {
        LayerKind::ALL.into_iter().all(|kind| {
            match (self.layer(kind), layout.slot(kind)) {
                (Some(layer), Some(slot)) => {
                    layer.rows == slot.rows
                        && layer.cols == slot.width
                        && layer.entries.len() == slot.rows
                        && layer
                            .entries
                            .iter()
                            .all(|r| r.keys().next_back().map_or(true, |&j| j < slot.width))
                }
                (None, None) => true,
                _ => false,
            }
        })
    }
}
