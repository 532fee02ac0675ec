// bootstrap.rs - multinomial bootstrap over a mutation matrix
// (SPEC_FULL.md 4.9)
//
// The RNG is seeded and dropped inside `resample`; nothing here reaches
// for a process-wide generator, so repeated runs stay reproducible and
// bootstrap replicates never perturb unrelated callers.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Binomial, Distribution};

use crate::model::MutationMatrix;

/// Draw one multinomial resample of `matrix` by sequential conditional
/// binomial draws: cell `k`'s count is `Binomial(remaining_n, p_k /
/// remaining_p)`, then both the remaining count and remaining probability
/// mass shrink before moving to cell `k + 1`. The final cell absorbs
/// whatever count is left, so the total is exactly conserved.
pub fn resample(matrix: &MutationMatrix, seed: u64) -> MutationMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let total = matrix.total();
    let flat_p: Vec<f64> = matrix
        .counts()
        .iter()
        .flatten()
        .map(|&c| c as f64 / total.max(1) as f64)
        .collect();

    let mut draws = [0u64; 16];
    let mut remaining_n = total;
    let mut remaining_p = 1.0f64;

    for (k, &p_k) in flat_p.iter().enumerate().take(15) {
        if remaining_n == 0 {
            break;
        }
        let conditional_p = if remaining_p > 0.0 {
            (p_k / remaining_p).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let draw = if conditional_p == 0.0 {
            0
        } else {
            Binomial::new(remaining_n, conditional_p)
                .expect("conditional probability is in [0, 1]")
                .sample(&mut rng)
        };
        draws[k] = draw;
        remaining_n -= draw;
        remaining_p -= p_k;
    }
    draws[15] = remaining_n;

    let mut counts = [[0u64; 4]; 4];
    for (k, &d) in draws.iter().enumerate() {
        counts[k / 4][k % 4] = d;
    }
    MutationMatrix::from_counts(counts)
}

/// Draw `replicates` independent resamples, one seed per replicate derived
/// from `base_seed` so a run is fully reproducible from a single CLI flag.
pub fn replicates(matrix: &MutationMatrix, replicates: usize, base_seed: u64) -> Vec<MutationMatrix> {
    (0..replicates)
        .map(|i| resample(matrix, base_seed.wrapping_add(i as u64)))
        .collect()
}
