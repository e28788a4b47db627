//! Read-only memory maps via `memmap2`. Writing produces a plain file.

use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use super::{plain, with_path};
use crate::error::FdfError;
use crate::registry::{ByteSource, Compression};

#[derive(Debug, Clone, Copy, Default)]
pub struct MmapCompression;

impl Compression for MmapCompression {
    fn name(&self) -> &str {
        "mmap"
    }

    fn open(&self, path: &Path) -> Result<ByteSource, FdfError> {
        let file = File::open(path).map_err(|e| with_path(path, e))?;
        let len = file.metadata().map_err(|e| with_path(path, e))?.len();
        if len == 0 {
            // Empty files cannot be mapped on every platform.
            return Ok(ByteSource::from_reader(io::empty()));
        }
        // SAFETY: the map is read-only and files must not be mutated while mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| with_path(path, e))?;
        Ok(ByteSource::Mapped(Arc::new(map)))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), FdfError> {
        plain::write(path, bytes)
    }
}
