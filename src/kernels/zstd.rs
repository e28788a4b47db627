//! Zstandard files via the streaming `zstd` encoder and decoder.
//!
//! Unlike an in-memory frame kernel there is no length header: the file is a plain
//! zstd frame that any `zstd -d` can read.

use std::io::Write;
use std::path::Path;
use zstd::stream::{Decoder, Encoder};

use super::{create_writer, open_reader, with_path};
use crate::error::FdfError;
use crate::registry::{ByteSource, Compression};

#[derive(Debug, Clone, Copy)]
pub struct ZstdCompression {
    level: i32,
}

impl ZstdCompression {
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompression {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Compression for ZstdCompression {
    fn name(&self) -> &str {
        "zst"
    }

    fn open(&self, path: &Path) -> Result<ByteSource, FdfError> {
        let decoder =
            Decoder::with_buffer(open_reader(path)?).map_err(|e| with_path(path, e))?;
        Ok(ByteSource::from_reader(decoder))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), FdfError> {
        let mut encoder =
            Encoder::new(create_writer(path)?, self.level).map_err(|e| with_path(path, e))?;
        encoder.write_all(bytes).map_err(|e| with_path(path, e))?;
        // `finish` is essential to finalize the Zstd frame.
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
    fn test_zstd_roundtrip_simple_text() {
        let bytes =
            b"hello world, this is a test of zstd compression. hello world, this is a test."
                .to_vec();
        assert_eq!(write_then_open(&ZstdCompression::default(), "t.txt.zst", &bytes), bytes);
    }

    #[test]
    fn test_zstd_highly_compressible_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("z.buf.zst");
        let bytes = vec![42u8; 10_000];
        ZstdCompression::new(5).write(&path, &bytes).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() < 50);
        assert_eq!(zstd::stream::decode_all(std::fs::File::open(&path).unwrap()).unwrap(), bytes);
    }

    #[test]
    fn test_zstd_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.buf.zst");
        std::fs::write(&path, [1u8, 2, 3, 4, 5]).unwrap();
        let result = ZstdCompression::default()
            .open(&path)
            .and_then(|source| source.read_to_vec().map_err(FdfError::from));
        assert!(result.is_err());
    }
}
