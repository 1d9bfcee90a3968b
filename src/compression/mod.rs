//! Compression backends for NCD size measurement
//!
//! Two interchangeable lossless algorithms (gzip and bzip2), each with
//! three level presets. The backend never keeps compressed output; it
//! counts bytes and throws them away.

pub mod deflate;
pub mod types;

pub use deflate::SizeCompressor;
pub use types::{CompressionAlgorithm, CompressionLevel};
