//! Compression algorithm and level presets
//!
//! The engine measures compressed sizes with one of two real lossless
//! compressors. Each preset maps to an algorithm-specific numeric level,
//! so a single `CompressionLevel` drives both backends consistently.

/// Compression algorithm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionAlgorithm {
    /// DEFLATE with gzip framing
    #[default]
    Gzip,

    /// Burrows-Wheeler based bzip2
    Bzip2,
}

impl CompressionAlgorithm {
    /// Returns human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Gzip => "gzip",
            CompressionAlgorithm::Bzip2 => "bzip2",
        }
    }
}

/// Compression level preset
///
/// Presets map to the numeric levels of each algorithm:
///
/// | Preset          | gzip    | bzip2 |
/// |-----------------|---------|-------|
/// | Default         | default | 6     |
/// | BestSpeed       | 1       | 1     |
/// | BestCompression | 9       | 9     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionLevel {
    /// Balanced speed and ratio
    #[default]
    Default,

    /// Fastest, weakest compression
    BestSpeed,

    /// Slowest, strongest compression
    BestCompression,
}

impl CompressionLevel {
    /// Maps the preset to a gzip (flate2) level
    pub fn gzip(&self) -> flate2::Compression {
        match self {
            CompressionLevel::Default => flate2::Compression::default(),
            CompressionLevel::BestSpeed => flate2::Compression::fast(),
            CompressionLevel::BestCompression => flate2::Compression::best(),
        }
    }

    /// Maps the preset to a bzip2 block-size level
    pub fn bzip2(&self) -> bzip2::Compression {
        match self {
            CompressionLevel::Default => bzip2::Compression::new(6),
            CompressionLevel::BestSpeed => bzip2::Compression::new(1),
            CompressionLevel::BestCompression => bzip2::Compression::new(9),
        }
    }
}
