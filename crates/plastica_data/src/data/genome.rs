use super::connection::SparseConnection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regulatory layer of a genome, listed in canonical order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// Environmental cue to gene.
    Cue,
    /// Gene to gene (recurrent regulation).
    Regulatory,
    /// Gene expression to epigenetic marks.
    Epigenetic,
    /// Epigenetic marks to higher-order state.
    HigherOrder,
    /// Pairwise interaction feeding the higher-order state.
    Interaction,
    /// Higher-order state to phenotype, applied transposed.
    Phenotype,
    /// Expression to the initial state handed to offspring, applied transposed.
    OffspringSeed,
}

impl LayerKind {
    /// Every layer kind in canonical order.
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Cue,
        LayerKind::Regulatory,
        LayerKind::Epigenetic,
        LayerKind::HigherOrder,
        LayerKind::Interaction,
        LayerKind::Phenotype,
        LayerKind::OffspringSeed,
    ];

    /// Short label used in logs and dot output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Cue => "E",
            LayerKind::Regulatory => "F",
            LayerKind::Epigenetic => "G",
            LayerKind::HigherOrder => "H",
            LayerKind::Interaction => "J",
            LayerKind::Phenotype => "P",
            LayerKind::OffspringSeed => "Z",
        }
    }

    /// Whether the layer is present in every configuration.
    #[must_use]
    pub fn is_mandatory(self) -> bool {
        matches!(
            self,
            LayerKind::Regulatory | LayerKind::Phenotype | LayerKind::OffspringSeed
        )
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The regulatory genome of one individual.
///
/// Optional layers are `None` when the model configuration disables them.
/// Every layer has one row per gene.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Genome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<SparseConnection>,
    pub regulatory: SparseConnection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epigenetic: Option<SparseConnection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_order: Option<SparseConnection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<SparseConnection>,
    pub phenotype: SparseConnection,
    pub offspring_seed: SparseConnection,
}

impl Genome {
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&SparseConnection> {
        match kind {
            LayerKind::Cue => self.cue.as_ref(),
            LayerKind::Regulatory => Some(&self.regulatory),
            LayerKind::Epigenetic => self.epigenetic.as_ref(),
            LayerKind::HigherOrder => self.higher_order.as_ref(),
            LayerKind::Interaction => self.interaction.as_ref(),
            LayerKind::Phenotype => Some(&self.phenotype),
            LayerKind::OffspringSeed => Some(&self.offspring_seed),
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> Option<&mut SparseConnection> {
        match kind {
            LayerKind::Cue => self.cue.as_mut(),
            LayerKind::Regulatory => Some(&mut self.regulatory),
            LayerKind::Epigenetic => self.epigenetic.as_mut(),
            LayerKind::HigherOrder => self.higher_order.as_mut(),
            LayerKind::Interaction => self.interaction.as_mut(),
            LayerKind::Phenotype => Some(&mut self.phenotype),
            LayerKind::OffspringSeed => Some(&mut self.offspring_seed),
        }
    }

    /// Present layers in canonical order.
    pub fn layers(&self) -> impl Iterator<Item = (LayerKind, &SparseConnection)> + '_ {
        LayerKind::ALL
            .into_iter()
            .filter_map(move |k| self.layer(k).map(|l| (k, l)))
    }

    /// Present layers in canonical order, mutably.
    pub fn layers_mut(&mut self) -> impl Iterator<Item = (LayerKind, &mut SparseConnection)> + '_ {
        let Genome {
            cue,
            regulatory,
            epigenetic,
            higher_order,
            interaction,
            phenotype,
            offspring_seed,
        } = self;
        [
            (LayerKind::Cue, cue.as_mut()),
            (LayerKind::Regulatory, Some(regulatory)),
            (LayerKind::Epigenetic, epigenetic.as_mut()),
            (LayerKind::HigherOrder, higher_order.as_mut()),
            (LayerKind::Interaction, interaction.as_mut()),
            (LayerKind::Phenotype, Some(phenotype)),
            (LayerKind::OffspringSeed, Some(offspring_seed)),
        ]
        .into_iter()
        .filter_map(|(k, l)| l.map(|l| (k, l)))
    }

    /// Number of genes (rows shared by every layer).
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.regulatory.rows
    }

    /// Total stored entries across present layers.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.layers().map(|(_, l)| l.nnz()).sum()
    }
}
