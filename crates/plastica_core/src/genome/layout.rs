use crate::config::AppConfig;
use plastica_data::LayerKind;
use serde::{Deserialize, Serialize};

/// One enabled layer: its kind, shape and fill density.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSlot {
    pub kind: LayerKind,
    pub rows: usize,
    /// Column count; also the share of the flat mutation index this layer claims.
    pub width: usize,
    pub density: f64,
}

/// Enabled layers in canonical order, computed once per run.
///
/// The mutation index space is the concatenation of the slot widths: a slot
/// of width `w` claims the next `w` index values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeLayout {
    slots: Vec<LayerSlot>,
    ngenes: usize,
    nenv: usize,
    effective_width: usize,
    full_width: usize,
    mutation_rate: f64,
}

impl GenomeLayout {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let model = &config.model;
        let slots: Vec<LayerSlot> = LayerKind::ALL
            .into_iter()
            .filter(|&k| model.is_enabled(k))
            .map(|kind| LayerSlot {
                kind,
                rows: model.ngenes,
                width: model.layer_width(kind),
                density: config.density.for_layer(kind),
            })
            .collect();
        let effective_width = slots.iter().map(|s| s.width).sum();
        let full_width = LayerKind::ALL
            .into_iter()
            .map(|k| model.layer_width(k))
            .sum();
        let mutation_rate = if effective_width == 0 {
            0.0
        } else {
            config.evolution.mutation_rate * full_width as f64 / effective_width as f64
        };
        Self {
            slots,
            ngenes: model.ngenes,
            nenv: model.nenv,
            effective_width,
            full_width,
            mutation_rate,
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[LayerSlot] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, kind: LayerKind) -> Option<&LayerSlot> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    #[must_use]
    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        self.slot(kind).is_some()
    }

    #[must_use]
    pub fn ngenes(&self) -> usize {
        self.ngenes
    }

    #[must_use]
    pub fn nenv(&self) -> usize {
        self.nenv
    }

    /// Sum of column counts over enabled layers.
    #[must_use]
    pub fn effective_width(&self) -> usize {
        self.effective_width
    }

    /// Sum of column counts with every optional layer enabled.
    #[must_use]
    pub fn full_width(&self) -> usize {
        self.full_width
    }

    /// Per-layer mutation rate, compensated so the expected number of
    /// mutated entries does not depend on which optional layers are enabled.
    #[must_use]
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Maps a flat gene index in `[0, effective_width)` to its layer.
    #[must_use]
    pub fn slot_for_index(&self, index: usize) -> Option<&LayerSlot> {
        let mut threshold = 0;
        for slot in &self.slots {
            threshold += slot.width;
            if index < threshold {
                return Some(slot);
            }
        }
        None
    }
}
