// driver.rs - the N x N pairwise distance matrix driver (SPEC_FULL.md 4.10)
//
// Builds one ESA + prefix cache per subject once, then fills the full
// matrix by scanning every ordered pair in both directions, merging the
// two directional mutation matrices, and estimating once from the merge.
// `SchedulingPolicy` is the one place "fast" and "low-memory" mode differ:
// which axis of the pair grid rayon parallelizes over, not two separate
// code paths.

use rayon::prelude::*;

use crate::anchor;
use crate::bootstrap;
use crate::cache::PrefixCache;
use crate::error::{CrateError, Diagnostics};
use crate::esa::Esa;
use crate::model::{Model, MutationMatrix};
use crate::sequence::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// Parallelize over rows; every subject's index is already resident,
    /// so the only cost of running every row concurrently is CPU.
    Fast,
    /// Parallelize within a row, one row at a time, bounding the number
    /// of in-flight per-pair working sets to the row width instead of
    /// the whole grid.
    LowMemory,
}

impl SchedulingPolicy {
    pub fn from_low_memory_flag(low_memory: bool) -> Self {
        if low_memory {
            SchedulingPolicy::LowMemory
        } else {
            SchedulingPolicy::Fast
        }
    }
}

/// Build one ESA + prefix cache per subject. A subject whose LCP array
/// overflows the 24-bit packing limit is dropped (logged via
/// `diagnostics`) rather than aborting the whole run -- every pair
/// touching it resolves to `NaN` downstream.
pub fn build_indices(
    subjects: &[Subject],
    cache_len: usize,
    diagnostics: &mut Diagnostics,
) -> Vec<Option<(Esa, PrefixCache)>> {
    let built: Vec<(Option<(Esa, PrefixCache)>, Diagnostics)> = subjects
        .par_iter()
        .map(|subject| {
            let mut local = Diagnostics::new();
            match Esa::build(&subject.rs, subject.name()) {
                Ok(esa) => {
                    let word_len = cache_len.min(12);
                    let cache = PrefixCache::build(&esa, &subject.rs, word_len);
                    (Some((esa, cache)), local)
                }
                Err(CrateError::IndexOverflow { sequence }) => {
                    local.record_index_overflow(&sequence);
                    (None, local)
                }
                Err(_) => (None, local),
            }
        })
        .collect();

    let mut indices = Vec::with_capacity(built.len());
    for (index, local) in built {
        diagnostics.merge(local);
        indices.push(index);
    }
    indices
}

/// Below this fraction of the two subjects' combined length, a pair's
/// merged mutation matrix is flagged as low coverage.
const LOW_COVERAGE_THRESHOLD: f64 = 0.5;

struct PairResult {
    distance: f64,
    matrix: MutationMatrix,
    diagnostics: Diagnostics,
}

fn pair_result(
    subjects: &[Subject],
    indices: &[Option<(Esa, PrefixCache)>],
    i: usize,
    j: usize,
    model: Model,
    pvalue: f64,
) -> PairResult {
    match (&indices[i], &indices[j]) {
        (Some((esa_i, cache_i)), Some((esa_j, cache_j))) => {
            let m_ij = anchor::scan(&subjects[i], esa_j, cache_j, &subjects[j], pvalue);
            let m_ji = anchor::scan(&subjects[j], esa_i, cache_i, &subjects[i], pvalue);

            let mut merged = m_ij;
            merged.merge(&m_ji);
            let d = model.estimate(&merged);

            let mut diagnostics = Diagnostics::new();
            let combined_len = (subjects[i].sequence.len() + subjects[j].sequence.len()) as f64;
            if combined_len > 0.0 && (merged.total() as f64 / combined_len) < LOW_COVERAGE_THRESHOLD {
                diagnostics.record_low_coverage(subjects[i].name(), subjects[j].name());
            }

            PairResult {
                distance: d,
                matrix: merged,
                diagnostics,
            }
        }
        _ => PairResult {
            distance: f64::NAN,
            matrix: MutationMatrix::new(),
            diagnostics: Diagnostics::new(),
        },
    }
}

/// The output of a full pairwise run: the point-estimate distance matrix,
/// plus (if bootstrapping was requested) one resampled distance matrix
/// per replicate, plus the pair-level diagnostics accumulated while
/// filling the grid (currently just low-coverage pairs).
pub struct MatrixResult {
    pub distances: Vec<Vec<f64>>,
    pub bootstrap_distances: Vec<Vec<Vec<f64>>>,
    pub diagnostics: Diagnostics,
}

/// Compute the full `N x N` distance matrix (and bootstrap replicates, if
/// `bootstrap_replicates > 0`) for `subjects`, using `indices` built by
/// `build_indices`.
pub fn run(
    subjects: &[Subject],
    indices: &[Option<(Esa, PrefixCache)>],
    model: Model,
    pvalue: f64,
    policy: SchedulingPolicy,
    bootstrap_replicates: usize,
    bootstrap_seed: u64,
) -> MatrixResult {
    let n = subjects.len();

    let diagonal = || PairResult {
        distance: 0.0,
        matrix: MutationMatrix::new(),
        diagnostics: Diagnostics::new(),
    };

    let row = |i: usize| -> Vec<PairResult> {
        (0..n)
            .map(|j| {
                if i == j {
                    diagonal()
                } else {
                    pair_result(subjects, indices, i, j, model, pvalue)
                }
            })
            .collect()
    };

    let grid: Vec<Vec<PairResult>> = match policy {
        SchedulingPolicy::Fast => (0..n).into_par_iter().map(row).collect(),
        SchedulingPolicy::LowMemory => (0..n)
            .map(|i| {
                (0..n)
                    .into_par_iter()
                    .map(|j| {
                        if i == j {
                            diagonal()
                        } else {
                            pair_result(subjects, indices, i, j, model, pvalue)
                        }
                    })
                    .collect()
            })
            .collect(),
    };

    let distances: Vec<Vec<f64>> = grid.iter().map(|row| row.iter().map(|r| r.distance).collect()).collect();

    let mut diagnostics = Diagnostics::new();
    for row in &grid {
        for r in row {
            diagnostics.merge(r.diagnostics.clone());
        }
    }

    let bootstrap_distances = if bootstrap_replicates == 0 {
        Vec::new()
    } else {
        (0..bootstrap_replicates)
            .map(|rep| {
                let seed = bootstrap_seed.wrapping_add(rep as u64);
                grid.iter()
                    .enumerate()
                    .map(|(i, row)| {
                        row.iter()
                            .enumerate()
                            .map(|(j, r)| {
                                if i == j {
                                    0.0
                                } else {
                                    let resampled = bootstrap::resample(&r.matrix, seed.wrapping_add((i * n + j) as u64));
                                    model.estimate(&resampled)
                                }
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    };

    MatrixResult {
        distances,
        bootstrap_distances,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use crate::sequence::Sequence;

    fn subject(name: &str, raw: &[u8]) -> Subject {
        let mut diag = Diagnostics::new();
        let seq = Sequence::prepare(name, raw, &mut diag).unwrap();
        Subject::from_sequence(seq).unwrap()
    }

    #[test]
    fn diagonal_is_always_zero() {
        let subjects = vec![
            subject("a", &b"ACGT".repeat(300)),
            subject("b", &b"ACGT".repeat(300)),
        ];
        let mut diag = Diagnostics::new();
        let indices = build_indices(&subjects, 4, &mut diag);
        let result = run(&subjects, &indices, Model::Raw, 0.5, SchedulingPolicy::Fast, 0, 0);
        assert_eq!(result.distances[0][0], 0.0);
        assert_eq!(result.distances[1][1], 0.0);
    }

    #[test]
    fn fast_and_low_memory_policies_agree() {
        let subjects = vec![
            subject("a", &b"ACGTACGTTTTT".repeat(100)),
            subject("b", &b"ACGTACGTTTTA".repeat(100)),
            subject("c", &b"ACGTACGTAAAA".repeat(100)),
        ];
        let mut diag = Diagnostics::new();
        let indices = build_indices(&subjects, 6, &mut diag);
        let fast = run(&subjects, &indices, Model::Raw, 0.5, SchedulingPolicy::Fast, 0, 0);
        let low = run(&subjects, &indices, Model::Raw, 0.5, SchedulingPolicy::LowMemory, 0, 0);
        assert_eq!(fast.distances, low.distances);
    }

    #[test]
    fn bootstrap_replicates_match_requested_count() {
        let subjects = vec![
            subject("a", &b"ACGTACGTTTTT".repeat(100)),
            subject("b", &b"ACGTACGTTTTA".repeat(100)),
        ];
        let mut diag = Diagnostics::new();
        let indices = build_indices(&subjects, 6, &mut diag);
        let result = run(&subjects, &indices, Model::Raw, 0.5, SchedulingPolicy::Fast, 3, 42);
        assert_eq!(result.bootstrap_distances.len(), 3);
        for rep in &result.bootstrap_distances {
            assert_eq!(rep.len(), 2);
            assert_eq!(rep[0].len(), 2);
        }
    }

    #[test]
    fn printed_distance_is_estimated_from_the_merged_matrix() {
        let subjects = vec![
            subject("a", &b"ACGTACGTTTTT".repeat(100)),
            subject("b", &b"ACGTACGTTTTA".repeat(100)),
        ];
        let mut diag = Diagnostics::new();
        let indices = build_indices(&subjects, 6, &mut diag);
        let r = pair_result(&subjects, &indices, 0, 1, Model::JukesCantor, 0.5);
        assert!((r.distance - Model::JukesCantor.estimate(&r.matrix)).abs() < 1e-12);
    }

    #[test]
    fn well_covered_pair_is_not_flagged_low_coverage() {
        let subjects = vec![
            subject("a", &b"ACGTACGTTTTT".repeat(100)),
            subject("b", &b"ACGTACGTTTTA".repeat(100)),
        ];
        let mut diag = Diagnostics::new();
        let indices = build_indices(&subjects, 6, &mut diag);
        let r = pair_result(&subjects, &indices, 0, 1, Model::Raw, 0.5);
        assert_eq!(r.diagnostics.low_coverage_pairs, 0);
    }
}
