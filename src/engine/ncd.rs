//! NCD computation engine
//!
//! Implements the normalized compression distance
//!
//! ```text
//! ncd(x, y) = (C(x‖y) − min(C(x), C(y))) / max(C(x), C(y))
//! ```
//!
//! for a single pair (`calculate`), a dense order-dependent matrix
//! (`unsymmetric`), and a packed symmetric matrix (`symmetric`). The
//! engine itself is just compressor configuration; every batch call owns
//! a fresh cache and result matrix, so one engine can serve overlapping
//! batch calls from multiple threads.

use crate::common::error::NcdResult;
use crate::compression::{CompressionAlgorithm, CompressionLevel, SizeCompressor};
use crate::engine::cache::SizeCache;
use crate::engine::wavefront;
use crate::invalid_input_err;
use crate::matrix::{AtomicTriangle, DistanceMatrix, SymmetricMatrix};
use log::debug;

/// Normalized compression distance engine
///
/// The algorithm is fixed at construction; the level preset can be
/// switched between computations with [`NcdEngine::set_compression_level`].
/// Switching levels in the middle of one batch computation is a caller
/// error: cached standalone sizes are never re-measured, so the resulting
/// matrix would mix presets.
#[derive(Debug, Clone)]
pub struct NcdEngine {
    compressor: SizeCompressor,
}

impl NcdEngine {
    /// Creates an engine using gzip at the default level
    pub fn new() -> Self {
        Self::with_algorithm(CompressionAlgorithm::Gzip)
    }

    /// Creates an engine using the given algorithm at the default level
    pub fn with_algorithm(algorithm: CompressionAlgorithm) -> Self {
        Self {
            compressor: SizeCompressor::new(algorithm),
        }
    }

    /// Returns the compression algorithm fixed at construction
    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.compressor.algorithm()
    }

    /// Returns the active level preset
    pub fn level(&self) -> CompressionLevel {
        self.compressor.level()
    }

    /// Remaps both algorithm presets immediately
    ///
    /// Affects only compressions performed after the call, never sizes
    /// already cached by a running batch.
    pub fn set_compression_level(&mut self, level: CompressionLevel) {
        self.compressor.set_level(level);
    }

    /// Computes the distance between two items
    ///
    /// The returned ratio is **unclamped**: compressor framing overhead
    /// can push it slightly above 1. Use [`NcdEngine::calculate_clamped`]
    /// for the capped variant the matrix computations apply.
    ///
    /// # Errors
    /// * `InvalidInput` if `a` (or `b`) is empty
    /// * `Io` if `is_file` and a path cannot be opened
    pub fn calculate(&self, a: &str, b: &str, is_file: bool) -> NcdResult<f64> {
        let ca = self.standalone(a, is_file)?;
        let cb = self.standalone(b, is_file)?;
        let cab = self.compressor.compressed_size(a, Some(b), is_file)?;
        Ok(ratio(cab, ca, cb))
    }

    /// [`NcdEngine::calculate`] with the result capped at 1
    pub fn calculate_clamped(&self, a: &str, b: &str, is_file: bool) -> NcdResult<f64> {
        self.calculate(a, b, is_file).map(cap_at_one)
    }

    /// Computes the dense order-dependent distance matrix
    ///
    /// Entry (i, j) is measured from the i‖j concatenation and entry
    /// (j, i) independently from j‖i, since compressors need not be
    /// order-invariant; both share the min/max of the cached standalone
    /// sizes. Entries are capped at 1, the diagonal is 0. Always runs
    /// single-threaded.
    ///
    /// # Errors
    /// `InvalidInput` if `items` is empty or any item is empty; `Io` for
    /// unreadable file items.
    pub fn unsymmetric<S: AsRef<str>>(
        &self,
        items: &[S],
        is_file: bool,
    ) -> NcdResult<DistanceMatrix> {
        if items.is_empty() {
            return Err(invalid_input_err!("batch must contain at least one item"));
        }

        let n = items.len();
        let cache = SizeCache::new(n);
        let mut matrix = DistanceMatrix::new(n);

        for i in 0..n {
            for j in i + 1..n {
                let ci = cache.get_or_compute(i, || self.standalone(items[i].as_ref(), is_file))?;
                let cj = cache.get_or_compute(j, || self.standalone(items[j].as_ref(), is_file))?;
                let cij =
                    self.compressor
                        .compressed_size(items[i].as_ref(), Some(items[j].as_ref()), is_file)?;
                let cji =
                    self.compressor
                        .compressed_size(items[j].as_ref(), Some(items[i].as_ref()), is_file)?;
                matrix.set(i, j, cap_at_one(ratio(cij, ci, cj)));
                matrix.set(j, i, cap_at_one(ratio(cji, ci, cj)));
            }
        }

        Ok(matrix)
    }

    /// Computes the packed symmetric distance matrix
    ///
    /// Only the (i, j) concatenation order with i < j is compressed; the
    /// lower triangle mirrors it. Entries are capped at 1, the diagonal
    /// is 0. Runs the parallel wavefront fill when the machine has more
    /// than one core, otherwise falls back to the sequential double loop.
    ///
    /// # Errors
    /// `InvalidInput` if `items` is empty or any item is empty; `Io` for
    /// unreadable file items. On a worker error the partial matrix is
    /// discarded and the first error (in bucket order) is returned.
    pub fn symmetric<S>(&self, items: &[S], is_file: bool) -> NcdResult<SymmetricMatrix>
    where
        S: AsRef<str> + Sync,
    {
        if items.is_empty() {
            return Err(invalid_input_err!("batch must contain at least one item"));
        }

        let workers = num_cpus::get();
        if workers > 1 && items.len() > 1 {
            self.symmetric_parallel(items, is_file, workers)
        } else {
            self.symmetric_sequential(items, is_file)
        }
    }

    fn symmetric_parallel<S>(
        &self,
        items: &[S],
        is_file: bool,
        workers: usize,
    ) -> NcdResult<SymmetricMatrix>
    where
        S: AsRef<str> + Sync,
    {
        let n = items.len();
        let cache = SizeCache::new(n);

        // The wavefront starts at the corner pair and walks the longest
        // anti-diagonals first, so items 0 and n-1 are needed by the
        // earliest buckets; measure them once up front instead of letting
        // several workers race on them immediately.
        cache.put(0, self.standalone(items[0].as_ref(), is_file)?);
        cache.put(n - 1, self.standalone(items[n - 1].as_ref(), is_file)?);

        let buckets = wavefront::partition(n, workers);
        debug!(
            "symmetric fill: {} items, {} pairs, {} workers",
            n,
            n * (n - 1) / 2,
            workers
        );

        let triangle = AtomicTriangle::new(n);
        let cache_ref = &cache;
        let triangle_ref = &triangle;

        // One scoped worker per bucket; the scope is the join barrier. All
        // workers run their buckets to completion, then the first error in
        // bucket order wins and the partial matrix is dropped.
        let first_err = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = buckets
                .iter()
                .map(|bucket| {
                    scope.spawn(move |_| {
                        self.fill_bucket(bucket, items, is_file, cache_ref, triangle_ref)
                    })
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|handle| handle.join().expect("ncd worker panicked").err())
                .next()
        })
        .expect("ncd worker panicked");

        match first_err {
            Some(err) => Err(err),
            None => Ok(triangle.into_matrix()),
        }
    }

    /// One worker's share of the symmetric fill
    ///
    /// Pairs arrive in wavefront order. Cache lookups may recompute a
    /// size another worker is computing at the same moment; both store
    /// the identical value (see `SizeCache`). Matrix cells are owned by
    /// exactly one worker, so stores never conflict.
    fn fill_bucket<S: AsRef<str>>(
        &self,
        bucket: &[(usize, usize)],
        items: &[S],
        is_file: bool,
        cache: &SizeCache,
        out: &AtomicTriangle,
    ) -> NcdResult<()> {
        for &(i, j) in bucket {
            let ci = cache.get_or_compute(i, || self.standalone(items[i].as_ref(), is_file))?;
            let cj = cache.get_or_compute(j, || self.standalone(items[j].as_ref(), is_file))?;
            let cij =
                self.compressor
                    .compressed_size(items[i].as_ref(), Some(items[j].as_ref()), is_file)?;
            out.store(i, j, cap_at_one(ratio(cij, ci, cj)));
        }
        Ok(())
    }

    fn symmetric_sequential<S: AsRef<str>>(
        &self,
        items: &[S],
        is_file: bool,
    ) -> NcdResult<SymmetricMatrix> {
        let n = items.len();
        let cache = SizeCache::new(n);
        let mut matrix = SymmetricMatrix::new(n);

        for i in 0..n {
            for j in i + 1..n {
                let ci = cache.get_or_compute(i, || self.standalone(items[i].as_ref(), is_file))?;
                let cj = cache.get_or_compute(j, || self.standalone(items[j].as_ref(), is_file))?;
                let cij =
                    self.compressor
                        .compressed_size(items[i].as_ref(), Some(items[j].as_ref()), is_file)?;
                matrix.set(i, j, cap_at_one(ratio(cij, ci, cj)));
            }
        }

        Ok(matrix)
    }

    fn standalone(&self, item: &str, is_file: bool) -> NcdResult<usize> {
        self.compressor.compressed_size(item, None, is_file)
    }
}

impl Default for NcdEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The NCD ratio from the pair size and the two standalone sizes
fn ratio(cab: usize, ca: usize, cb: usize) -> f64 {
    (cab as f64 - ca.min(cb) as f64) / ca.max(cb) as f64
}

/// Compressor framing can push the ratio past 1; cap it there
fn cap_at_one(value: f64) -> f64 {
    value.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::NcdError;

    const ITEMS: [&str; 4] = [
        "the quick brown fox jumps over the lazy dog",
        "the quick brown fox jumps over the lazy cat",
        "pack my box with five dozen liquor jugs",
        "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
    ];

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(30, 20, 25), (30.0 - 20.0) / 25.0);
        assert_eq!(ratio(10, 20, 25), (10.0 - 20.0) / 25.0);
    }

    #[test]
    fn test_cap_at_one() {
        assert_eq!(cap_at_one(1.5), 1.0);
        assert_eq!(cap_at_one(0.5), 0.5);
    }

    #[test]
    fn test_self_distance_is_small() {
        let engine = NcdEngine::new();
        let text = "a fairly ordinary sentence that compresses like ordinary text does";
        let d = engine.calculate(text, text, false).unwrap();
        assert!(d < 0.3, "self distance should be near zero, got {}", d);
    }

    #[test]
    fn test_calculate_clamped_never_exceeds_one() {
        let engine = NcdEngine::new();
        // Tiny inputs are dominated by gzip framing, the classic way to
        // push the raw ratio past 1.
        let d = engine.calculate_clamped("ab", "xy", false).unwrap();
        assert!(d <= 1.0);
    }

    #[test]
    fn test_calculate_rejects_empty() {
        let engine = NcdEngine::new();
        let err = engine.calculate("", "something", false).unwrap_err();
        assert!(matches!(err, NcdError::InvalidInput(_)));
    }

    #[test]
    fn test_unsymmetric_shape_and_bounds() {
        let engine = NcdEngine::new();
        let matrix = engine.unsymmetric(&ITEMS, false).unwrap();
        assert_eq!(matrix.dim(), ITEMS.len());
        for i in 0..matrix.dim() {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..matrix.dim() {
                let d = matrix.get(i, j);
                assert!((0.0..=1.0).contains(&d), "entry ({},{}) = {}", i, j, d);
            }
        }
    }

    #[test]
    fn test_symmetric_matches_sequential_fill() {
        // Whatever path `symmetric` picks on this machine, it must agree
        // with the sequential reference fill.
        let engine = NcdEngine::new();
        let via_api = engine.symmetric(&ITEMS, false).unwrap();
        let sequential = engine.symmetric_sequential(&ITEMS, false).unwrap();
        assert_eq!(via_api, sequential);
    }

    #[test]
    fn test_symmetric_empty_batch() {
        let engine = NcdEngine::new();
        let err = engine.symmetric(&[] as &[&str], false).unwrap_err();
        assert!(matches!(err, NcdError::InvalidInput(_)));

        let err = engine.unsymmetric(&[] as &[&str], false).unwrap_err();
        assert!(matches!(err, NcdError::InvalidInput(_)));
    }

    #[test]
    fn test_symmetric_single_item() {
        let engine = NcdEngine::new();
        let matrix = engine.symmetric(&["x"], false).unwrap();
        assert_eq!(matrix.dim(), 1);
        assert_eq!(matrix.get(0, 0), 0.0);
    }

    #[test]
    fn test_parallel_worker_error_aborts_batch() {
        let engine = NcdEngine::new();
        // An empty item fails inside whichever worker touches it first.
        let items = ["aaaa", "bbbb", "", "dddd", "eeee"];
        let err = engine.symmetric(&items, false).unwrap_err();
        assert!(matches!(err, NcdError::InvalidInput(_)));
    }

    #[test]
    fn test_bzip2_engine() {
        let engine = NcdEngine::with_algorithm(CompressionAlgorithm::Bzip2);
        assert_eq!(engine.algorithm(), CompressionAlgorithm::Bzip2);
        let matrix = engine.symmetric(&ITEMS[..3], false).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((0.0..=1.0).contains(&matrix.get(i, j)));
            }
        }
    }
}
