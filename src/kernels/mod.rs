//! File-level compression strategies.
//!
//! Each kernel is a thin, panic-free wrapper around one codec crate and implements
//! `registry::Compression`. Readers are streaming; writers stream into a buffered
//! file and finalize the codec frame before returning. File handles live only as
//! long as the source or writer that owns them.

pub mod bz2;
pub mod gzip;
pub mod lzma;
pub mod mmap;
pub mod plain;
pub mod zstd;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use crate::error::FdfError;

/// Attaches the path to an I/O error so the user can tell which file failed.
pub(crate) fn with_path(path: &Path, e: io::Error) -> FdfError {
    FdfError::Io(io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
}

pub(crate) fn open_reader(path: &Path) -> Result<BufReader<File>, FdfError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| with_path(path, e))
}

pub(crate) fn create_writer(path: &Path) -> Result<BufWriter<File>, FdfError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| with_path(path, e))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::registry::Compression;

    /// Writes `bytes` through `strategy` into a temp dir and reads them back.
    pub fn write_then_open(strategy: &dyn Compression, file_name: &str, bytes: &[u8]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        strategy.write(&path, bytes).unwrap();
        strategy.open(&path).unwrap().read_to_vec().unwrap()
    }
}
