use serde::{Deserialize, Serialize};

/// Environmental state presented to one cell type.
///
/// Components are `±1` for generated cues. The all-zero cue stands for
/// "no cue".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cue(pub Vec<f64>);

impl Cue {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// One cue per cell type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cues(pub Vec<Cue>);

impl Cues {
    /// `ncells` zero cues of length `nenv`.
    #[must_use]
    pub fn zeros(ncells: usize, nenv: usize) -> Self {
        Self(vec![Cue::zeros(nenv); ncells])
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.0.len()
    }

    /// Length shared by every cue, or `None` if the collection is empty or
    /// ragged.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        let first = self.0.first()?.len();
        self.0.iter().all(|c| c.len() == first).then_some(first)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.0.iter()
    }

    /// Sum over components of the across-cell variance.
    #[must_use]
    pub fn cross_cell_variance(&self) -> f64 {
        let rows: Vec<&[f64]> = self.0.iter().map(Cue::as_slice).collect();
        cross_variance(&rows)
    }
}

/// Sum over components of the variance of `samples[.][k]`.
///
/// Returns zero for fewer than two samples.
#[must_use]
pub fn cross_variance(samples: &[&[f64]]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let dim = samples[0].len();
    let mut total = 0.0;
    for k in 0..dim {
        let mean = samples.iter().map(|s| s[k]).sum::<f64>() / n as f64;
        total += samples.iter().map(|s| (s[k] - mean).powi(2)).sum::<f64>() / n as f64;
    }
    total
}
