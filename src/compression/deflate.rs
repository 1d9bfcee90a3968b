//! Compressed-size measurement backend
//!
//! NCD only needs the *size* of the compressed output, never the output
//! itself. `SizeCompressor` streams input through a gzip or bzip2 encoder
//! whose sink is a byte counter that discards everything it receives, so
//! the compressed stream is never held in memory.
//!
//! Pairs are measured as a single logical stream: the first source is fed
//! fully into the encoder, then the second, and the encoder is finalized
//! once. File inputs are streamed straight from disk; the concatenation is
//! never materialized.

use crate::common::error::{NcdError, NcdResult};
use crate::compression::types::{CompressionAlgorithm, CompressionLevel};
use crate::invalid_input_err;
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, Write};

/// Write sink that counts bytes and discards them
#[derive(Debug, Default)]
struct ByteCounter {
    written: usize,
}

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encoder over a counting sink, one variant per algorithm
enum CountingEncoder {
    Gzip(GzEncoder<ByteCounter>),
    Bzip2(BzEncoder<ByteCounter>),
}

impl CountingEncoder {
    /// Finalizes the compressed stream and returns the total byte count
    ///
    /// The count is only correct after the encoder has flushed its
    /// trailing checksum/framing, so this consumes the encoder.
    fn finish(self) -> io::Result<usize> {
        let counter = match self {
            CountingEncoder::Gzip(encoder) => encoder.finish()?,
            CountingEncoder::Bzip2(encoder) => encoder.finish()?,
        };
        Ok(counter.written)
    }
}

impl Write for CountingEncoder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CountingEncoder::Gzip(encoder) => encoder.write(buf),
            CountingEncoder::Bzip2(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CountingEncoder::Gzip(encoder) => encoder.flush(),
            CountingEncoder::Bzip2(encoder) => encoder.flush(),
        }
    }
}

/// Compressed-size backend
///
/// Deterministic: identical input and level preset always yield the same
/// byte count.
#[derive(Debug, Clone, Copy)]
pub struct SizeCompressor {
    algorithm: CompressionAlgorithm,
    level: CompressionLevel,
}

impl SizeCompressor {
    /// Creates a backend for the given algorithm at the default level
    pub fn new(algorithm: CompressionAlgorithm) -> Self {
        Self {
            algorithm,
            level: CompressionLevel::default(),
        }
    }

    /// Returns the active algorithm
    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.algorithm
    }

    /// Returns the active level preset
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Switches the level preset for all subsequent measurements
    pub fn set_level(&mut self, level: CompressionLevel) {
        self.level = level;
    }

    /// Measures the compressed size of one input, or of the concatenation
    /// of two inputs as a single stream
    ///
    /// When `is_file` is set, each input is a path whose contents are
    /// streamed into the encoder; otherwise the inputs are literal bytes.
    ///
    /// # Errors
    /// * `InvalidInput` if the combined input is zero bytes
    /// * `Io` if a file cannot be opened or read
    pub fn compressed_size(
        &self,
        first: &str,
        second: Option<&str>,
        is_file: bool,
    ) -> NcdResult<usize> {
        let mut encoder = self.encoder();
        let mut fed: u64 = 0;

        if is_file {
            fed += copy_file(first, &mut encoder)?;
            if let Some(path) = second {
                fed += copy_file(path, &mut encoder)?;
            }
        } else {
            encoder.write_all(first.as_bytes())?;
            fed += first.len() as u64;
            if let Some(literal) = second {
                encoder.write_all(literal.as_bytes())?;
                fed += literal.len() as u64;
            }
        }

        if fed == 0 {
            return Err(invalid_input_err!("input size must be greater than zero"));
        }

        Ok(encoder.finish()?)
    }

    fn encoder(&self) -> CountingEncoder {
        match self.algorithm {
            CompressionAlgorithm::Gzip => {
                CountingEncoder::Gzip(GzEncoder::new(ByteCounter::default(), self.level.gzip()))
            }
            CompressionAlgorithm::Bzip2 => {
                CountingEncoder::Bzip2(BzEncoder::new(ByteCounter::default(), self.level.bzip2()))
            }
        }
    }
}

/// Streams a file's full contents into the encoder, returning the number
/// of uncompressed bytes read
fn copy_file(path: &str, encoder: &mut CountingEncoder) -> NcdResult<u64> {
    let mut file = File::open(path).map_err(NcdError::Io)?;
    Ok(io::copy(&mut file, encoder)?)
}
