//! ncdist - Normalized Compression Distance
//!
//! Computes the normalized compression distance (NCD) between byte
//! sequences, using the byte count of a real lossless compressor (gzip or
//! bzip2) as a proxy for Kolmogorov complexity:
//!
//! ```text
//! ncd(x, y) = (C(x‖y) − min(C(x), C(y))) / max(C(x), C(y))
//! ```
//!
//! Items are literal strings or file paths. Batches produce either a
//! dense order-dependent matrix or a packed symmetric matrix; the
//! symmetric fill parallelizes the O(n²) compression work across worker
//! threads with a deterministic anti-diagonal (wavefront) partition.
//!
//! ```no_run
//! use ncdist::NcdEngine;
//!
//! let engine = NcdEngine::new();
//! let d = engine.calculate("first text", "second text", false)?;
//! let matrix = engine.symmetric(&["aaa", "aab", "zzz"], false)?;
//! assert_eq!(matrix.get(0, 0), 0.0);
//! # Ok::<(), ncdist::NcdError>(())
//! ```

pub mod common;
pub mod compression;
pub mod engine;
pub mod matrix;

// Re-export common types for convenience
pub use common::{NcdError, NcdResult};

// Re-export the compression surface for convenience
pub use compression::{CompressionAlgorithm, CompressionLevel, SizeCompressor};

// Re-export the engine and result matrices for convenience
pub use engine::NcdEngine;
pub use matrix::{DistanceMatrix, SymmetricMatrix};
