//! Sparse connection algebra.
//!
//! Only the operations genomes need: random fill, point mutation, scaling,
//! differences and the two matrix-vector products.

use plastica_data::SparseConnection;
use rand::Rng;
use rand_distr::StandardNormal;

/// Behaviour of a [`SparseConnection`] used by the simulation engine.
pub trait ConnectionLogic {
    /// Replaces all entries: each position is present with probability
    /// `density`, holding a standard-normal weight.
    fn randomize<R: Rng>(&mut self, density: f64, rng: &mut R);

    /// Performs `round(rate × rows × cols)` point mutations and returns that
    /// count. Positions are drawn with replacement.
    fn mutate<R: Rng>(&mut self, density: f64, rate: f64, rng: &mut R) -> usize;

    fn scale(&mut self, c: f64);

    /// Entrywise `a − b` over the union of stored positions.
    fn diff(a: &Self, b: &Self) -> Self;

    /// Entrywise `self += other`.
    fn accumulate(&mut self, other: &Self);

    /// `out[i] = Σⱼ A[i,j]·v[j]`; `out` is overwritten.
    fn multiply(&self, out: &mut [f64], v: &[f64]);

    /// `out[j] = Σᵢ A[i,j]·v[i]`; `out` is overwritten.
    fn multiply_transpose(&self, out: &mut [f64], v: &[f64]);

    /// Sum of squared stored weights.
    fn frobenius_sq(&self) -> f64;

    /// Exchanges row `row` between two connections of the same shape.
    fn swap_row(&mut self, other: &mut Self, row: usize);

    /// Dense row-major copy: row by row, columns in order within a row.
    fn flatten(&self) -> Vec<f64>;
}

impl ConnectionLogic for SparseConnection {
    fn randomize<R: Rng>(&mut self, density: f64, rng: &mut R) {
        self.clear();
        for i in 0..self.rows {
            for j in 0..self.cols {
                if rng.gen_bool(density) {
                    let w: f64 = rng.sample(StandardNormal);
                    self.set(i, j, w);
                }
            }
        }
    }

    fn mutate<R: Rng>(&mut self, density: f64, rate: f64, rng: &mut R) -> usize {
        if self.rows == 0 || self.cols == 0 {
            return 0;
        }
        let attempts = (rate * (self.rows * self.cols) as f64).round() as usize;
        for _ in 0..attempts {
            let i = rng.gen_range(0..self.rows);
            let j = rng.gen_range(0..self.cols);
            self.remove(i, j);
            if rng.gen_bool(density) {
                let w: f64 = rng.sample(StandardNormal);
                self.set(i, j, w);
            }
        }
        attempts
    }

    fn scale(&mut self, c: f64) {
        for row in &mut self.entries {
            for w in row.values_mut() {
                *w *= c;
            }
        }
    }

    fn diff(a: &Self, b: &Self) -> Self {
        assert!(a.same_shape(b), "diff of differently shaped connections");
        let mut out = a.clone();
        for (i, j, w) in b.iter() {
            let v = out.get(i, j) - w;
            out.set(i, j, v);
        }
        out
    }

    fn accumulate(&mut self, other: &Self) {
        assert!(self.same_shape(other), "accumulate of differently shaped connections");
        for (i, j, w) in other.iter() {
            let v = self.get(i, j) + w;
            self.set(i, j, v);
        }
    }

    fn multiply(&self, out: &mut [f64], v: &[f64]) {
        debug_assert_eq!(out.len(), self.rows);
        debug_assert_eq!(v.len(), self.cols);
        for (o, row) in out.iter_mut().zip(&self.entries) {
            *o = row.iter().map(|(&j, &w)| w * v[j]).sum();
        }
    }

    fn multiply_transpose(&self, out: &mut [f64], v: &[f64]) {
        debug_assert_eq!(out.len(), self.cols);
        debug_assert_eq!(v.len(), self.rows);
        out.fill(0.0);
        for (row, &vi) in self.entries.iter().zip(v) {
            if vi == 0.0 {
                continue;
            }
            for (&j, &w) in row {
                out[j] += w * vi;
            }
        }
    }

    fn frobenius_sq(&self) -> f64 {
        self.entries
            .iter()
            .flat_map(|r| r.values())
            .map(|w| w * w)
            .sum()
    }

    fn swap_row(&mut self, other: &mut Self, row: usize) {
        debug_assert!(self.same_shape(other));
        std::mem::swap(&mut self.entries[row], &mut other.entries[row]);
    }

    fn flatten(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.rows * self.cols];
        for (i, j, w) in self.iter() {
            out[i * self.cols + j] = w;
        }
        out
    }
}
