//! Environmental cues: generation, noise and directed change.

use plastica_data::{Cue, Cues};
use rand::seq::index;
use rand::Rng;

/// Random operators on a single cue.
pub trait CueLogic: Sized {
    /// A cue of `len` independent `±1` components.
    fn random<R: Rng>(len: usize, rng: &mut R) -> Self;

    /// A copy in which each component flips sign with probability `eta`.
    fn with_noise<R: Rng>(&self, eta: f64, rng: &mut R) -> Self;

    /// A copy with exactly `round(fraction × len)` distinct components
    /// flipped.
    fn changed<R: Rng>(&self, fraction: f64, rng: &mut R) -> Self;

    fn dist2(&self, other: &Self) -> f64;
}

impl CueLogic for Cue {
    fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Cue((0..len)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect())
    }

    fn with_noise<R: Rng>(&self, eta: f64, rng: &mut R) -> Self {
        if eta <= 0.0 {
            return self.clone();
        }
        Cue(self
            .0
            .iter()
            .map(|&x| if rng.gen_bool(eta) { -x } else { x })
            .collect())
    }

    fn changed<R: Rng>(&self, fraction: f64, rng: &mut R) -> Self {
        let len = self.len();
        let n = ((fraction * len as f64).round() as usize).min(len);
        let mut out = self.clone();
        for k in index::sample(rng, len, n) {
            out.0[k] = -out.0[k];
        }
        out
    }

    fn dist2(&self, other: &Self) -> f64 {
        dist2(&self.0, &other.0)
    }
}

/// Random operators on a per-cell-type cue collection.
pub trait CuesLogic: Sized {
    fn random<R: Rng>(ncells: usize, nenv: usize, rng: &mut R) -> Self;
    fn with_noise<R: Rng>(&self, eta: f64, rng: &mut R) -> Self;
    fn changed<R: Rng>(&self, fraction: f64, rng: &mut R) -> Self;
}

impl CuesLogic for Cues {
    fn random<R: Rng>(ncells: usize, nenv: usize, rng: &mut R) -> Self {
        Cues((0..ncells).map(|_| Cue::random(nenv, rng)).collect())
    }

    fn with_noise<R: Rng>(&self, eta: f64, rng: &mut R) -> Self {
        Cues(self.iter().map(|c| c.with_noise(eta, rng)).collect())
    }

    fn changed<R: Rng>(&self, fraction: f64, rng: &mut R) -> Self {
        Cues(self.iter().map(|c| c.changed(fraction, rng)).collect())
    }
}

/// Squared Euclidean distance.
#[must_use]
pub fn dist2(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
