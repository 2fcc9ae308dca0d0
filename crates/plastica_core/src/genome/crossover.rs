use crate::sparse::ConnectionLogic;
use plastica_data::Genome;
use rand::Rng;

/// Reciprocal gene-row crossover between two genome copies.
///
/// Each gene row is exchanged with probability 0.5. The exchange covers
/// that row in every present layer together with the matching component of
/// the two seed vectors. Returns the number of rows exchanged.
pub fn genome_crossover_with_rng<R: Rng>(
    a: &mut Genome,
    b: &mut Genome,
    seed_a: &mut [f64],
    seed_b: &mut [f64],
    rng: &mut R,
) -> usize {
    let ngenes = a.gene_count();
    debug_assert_eq!(ngenes, b.gene_count());
    debug_assert_eq!(seed_a.len(), ngenes);
    debug_assert_eq!(seed_b.len(), ngenes);

    let mut swapped = 0;
    for row in 0..ngenes {
        if !rng.gen_bool(0.5) {
            continue;
        }
        for ((_, la), (_, lb)) in a.layers_mut().zip(b.layers_mut()) {
            la.swap_row(lb, row);
        }
        std::mem::swap(&mut seed_a[row], &mut seed_b[row]);
        swapped += 1;
    }
    swapped
}
