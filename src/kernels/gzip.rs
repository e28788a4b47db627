//! gzip files via `flate2`. Multi-member streams are read in full.

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;

use super::{create_writer, open_reader, with_path};
use crate::error::FdfError;
use crate::registry::{ByteSource, Compression};

#[derive(Debug, Clone, Copy)]
pub struct GzipCompression {
    level: u32,
}

impl GzipCompression {
    /// `level` is clamped to flate2's 0..=9 range.
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

impl Default for GzipCompression {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Compression for GzipCompression {
    fn name(&self) -> &str {
        "gz"
    }

    fn open(&self, path: &Path) -> Result<ByteSource, FdfError> {
        Ok(ByteSource::from_reader(MultiGzDecoder::new(open_reader(path)?)))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), FdfError> {
        let mut encoder = GzEncoder::new(create_writer(path)?, flate2::Compression::new(self.level));
        encoder.write_all(bytes).map_err(|e| with_path(path, e))?;
        encoder
            .finish()
            .and_then(|mut file| file.flush())
            .map_err(|e| with_path(path, e))
    }
}
