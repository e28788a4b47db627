//! `lzma`-tagged files, written and read in the xz container via `xz2`.

use std::io::Write;
use std::path::Path;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use super::{create_writer, open_reader, with_path};
use crate::error::FdfError;
use crate::registry::{ByteSource, Compression};

#[derive(Debug, Clone, Copy)]
pub struct LzmaCompression {
    preset: u32,
}

impl LzmaCompression {
    /// `preset` is clamped to liblzma's 0..=9 range.
    pub fn new(preset: u32) -> Self {
        Self {
            preset: preset.min(9),
        }
    }
}

impl Default for LzmaCompression {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Compression for LzmaCompression {
    fn name(&self) -> &str {
        "lzma"
    }

    fn open(&self, path: &Path) -> Result<ByteSource, FdfError> {
        Ok(ByteSource::from_reader(XzDecoder::new_multi_decoder(
            open_reader(path)?,
        )))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), FdfError> {
        let mut encoder = XzEncoder::new(create_writer(path)?, self.preset);
        encoder.write_all(bytes).map_err(|e| with_path(path, e))?;
        encoder
            .finish()
            .and_then(|mut file| file.flush())
            .map_err(|e| with_path(path, e))
    }
}
