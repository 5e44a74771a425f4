//! Pure scorer: reads an immutable snapshot of the category store and
//! produces activations. Holds no mutable state and performs no weight
//! updates — the orchestrating `ArtEngine::learn`/`predict` applies whatever
//! update the arbiter's verdict calls for, after the scorer has returned.

use crate::category::CategoryStore;
use crate::kernel::{self, KernelKind};
use crate::pattern::Pattern;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub id: usize,
    pub activation: f32,
}

/// `(T desc, id asc)` ordering: the tie-break every ranking and merge in this
/// module must agree on.
fn better(a: &Scored, b: &Scored) -> std::cmp::Ordering {
    b.activation
        .partial_cmp(&a.activation)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then(a.id.cmp(&b.id))
}

/// Minimum chunk size so parallel scoring amortizes task spawn overhead.
const MIN_CHUNK: usize = 32;

/// Scores every category in `store` against `input`, returning results
/// sorted by `(activation desc, id asc)`. Dispatches to rayon chunks above
/// `parallel_threshold`; the result is identical to the sequential path
/// (modulo kernel tolerance) regardless of chunking, since a parallel `map`
/// over indices preserves positional order on collect.
pub fn rank(
    kind: KernelKind,
    input: &Pattern,
    store: &CategoryStore,
    use_simd: bool,
    parallel_threshold: usize,
) -> Vec<Scored> {
    let n = store.len();
    let mut scored: Vec<Scored> = if n > parallel_threshold {
        let chunk_size = (n / rayon::current_num_threads().max(1)).max(MIN_CHUNK);
        (0..n)
            .collect::<Vec<_>>()
            .par_chunks(chunk_size)
            .flat_map(|chunk| {
                chunk
                    .iter()
                    .map(|&id| {
                        let category = store.get(id).expect("id within store bounds");
                        Scored {
                            id,
                            activation: kernel::activation(kind, input, &category.weight, use_simd),
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        (0..n)
            .map(|id| {
                let category = store.get(id).expect("id within store bounds");
                Scored {
                    id,
                    activation: kernel::activation(kind, input, &category.weight, use_simd),
                }
            })
            .collect()
    };
    scored.sort_by(better);
    scored
}

/// Chunk-reduce variant: computes a partial `(best_id, best_T)` per chunk
/// and merges chunks with the same tie-breaking rule as `rank`. Used where
/// only the single best candidate is needed rather than the full ranking;
/// must agree with `rank().first()` for any input.
pub fn parallel_best(
    kind: KernelKind,
    input: &Pattern,
    store: &CategoryStore,
    use_simd: bool,
    parallel_threshold: usize,
) -> Option<Scored> {
    let n = store.len();
    if n == 0 {
        return None;
    }
    if n <= parallel_threshold {
        return (0..n)
            .map(|id| {
                let category = store.get(id).expect("id within store bounds");
                Scored {
                    id,
                    activation: kernel::activation(kind, input, &category.weight, use_simd),
                }
            })
            .min_by(better);
    }
    let chunk_size = (n / rayon::current_num_threads().max(1)).max(MIN_CHUNK);
    (0..n)
        .collect::<Vec<_>>()
        .par_chunks(chunk_size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&id| {
                    let category = store.get(id).expect("id within store bounds");
                    Scored {
                        id,
                        activation: kernel::activation(kind, input, &category.weight, use_simd),
                    }
                })
                .min_by(better)
                .expect("non-empty chunk")
        })
        .collect::<Vec<_>>()
        .into_iter()
        .min_by(better)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CategoryWeight;

    fn store_with(weights: Vec<Vec<f32>>, max: usize) -> CategoryStore {
        let mut store = CategoryStore::new(max);
        for w in weights {
            store.allocate(CategoryWeight::Fuzzy(Pattern::new(w))).unwrap();
        }
        store
    }

    #[test]
    fn rank_orders_by_activation_desc_then_id_asc() {
        let store = store_with(
            vec![vec![1.0, 1.0], vec![0.1, 0.1], vec![1.0, 1.0]],
            10,
        );
        let input = Pattern::new(vec![1.0, 1.0]);
        let kind = KernelKind::Fuzzy { alpha: 0.01 };
        let ranked = rank(kind, &input, &store, false, 1000);
        // categories 0 and 2 tie in activation; id 0 must sort first.
        assert_eq!(ranked[0].id, 0);
        assert_eq!(ranked[1].id, 2);
        assert_eq!(ranked[2].id, 1);
    }

    #[test]
    fn parallel_and_sequential_best_agree() {
        let weights: Vec<Vec<f32>> = (0..200)
            .map(|i| vec![(i as f32 % 7.0) / 7.0, ((i * 3) as f32 % 11.0) / 11.0])
            .collect();
        let store = store_with(weights, 1000);
        let input = Pattern::new(vec![0.5, 0.5]);
        let kind = KernelKind::Fuzzy { alpha: 0.01 };
        let sequential = parallel_best(kind, &input, &store, false, usize::MAX).unwrap();
        let parallel = parallel_best(kind, &input, &store, false, 0).unwrap();
        assert_eq!(sequential, parallel);
    }
}
