//! Anti-diagonal ("wavefront") work partitioning
//!
//! The symmetric fill has to cover every unordered index pair
//! {(i, j): i < j < n}. Pairs are emitted by anti-diagonal, starting at
//! the corner pair (0, n−1) and working inward:
//!
//! ```text
//! offset n−1: (0, n−1)
//! offset n−2: (0, n−2) (1, n−1)
//! offset n−3: (0, n−3) (1, n−2) (2, n−1)
//! ```
//!
//! and assigned round-robin to worker buckets in emission order. Starting
//! from the longest offsets visits the boundary rows 0 and n−1 first,
//! which is why the engine pre-warms exactly those two cache slots before
//! dispatching workers. Round-robin keeps bucket sizes within one pair of
//! each other for any n and worker count, and the whole scheme is
//! deterministic so bucket contents are reproducible.

/// Partitions all pairs (i, j), i < j < n, into `workers` buckets
///
/// Each pair lands in exactly one bucket; the union of all buckets is the
/// full pair set. `n <= 1` yields `workers` empty buckets.
///
/// # Panics
/// Panics if `workers` is zero.
pub fn partition(n: usize, workers: usize) -> Vec<Vec<(usize, usize)>> {
    assert!(workers > 0, "worker count must be greater than zero");

    let mut buckets = vec![Vec::new(); workers];
    if n < 2 {
        return buckets;
    }

    let mut next = 0usize;
    for offset in (1..n).rev() {
        for row in 0..n - offset {
            buckets[next % workers].push((row, row + offset));
            next += 1;
        }
    }
    buckets
}
