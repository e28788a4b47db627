//! bzip2 files via the `bzip2` crate.

use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use std::io::Write;
use std::path::Path;

use super::{create_writer, open_reader, with_path};
use crate::error::FdfError;
use crate::registry::{ByteSource, Compression};

#[derive(Debug, Clone, Copy)]
pub struct Bzip2Compression {
    level: u32,
}

impl Bzip2Compression {
    /// `level` is the block size in 100k units, clamped to 1..=9.
    pub fn new(level: u32) -> Self {
        Self {
            level: level.clamp(1, 9),
        }
    }
}

impl Default for Bzip2Compression {
    fn default() -> Self {
        Self::new(9)
    }
}

impl Compression for Bzip2Compression {
    fn name(&self) -> &str {
        "bz2"
    }

    fn open(&self, path: &Path) -> Result<ByteSource, FdfError> {
        Ok(ByteSource::from_reader(MultiBzDecoder::new(open_reader(path)?)))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), FdfError> {
        let mut encoder = BzEncoder::new(create_writer(path)?, bzip2::Compression::new(self.level));
        encoder.write_all(bytes).map_err(|e| with_path(path, e))?;
        encoder
            .finish()
            .and_then(|mut file| file.flush())
            .map_err(|e| with_path(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_support::write_then_open;

    #[test]
    fn test_bz2_roundtrip() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(write_then_open(&Bzip2Compression::default(), "a.buf.bz2", &bytes), bytes);
    }

    #[test]
    fn test_bz2_empty_payload() {
        assert!(write_then_open(&Bzip2Compression::new(1), "e.buf.bz2", b"").is_empty());
    }
}
