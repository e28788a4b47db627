//! Compression strategies wrap the file stream underneath a backend.

use hashbrown::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::ByteSource;
use crate::config::FdfConfig;
use crate::error::FdfError;
use crate::kernels;

/// A file-level wrapper selected by the optional compression tag of a file name.
pub trait Compression: Send + Sync {
    fn name(&self) -> &str;

    /// Opens `path` for reading and returns the decompressed bytes as a source.
    fn open(&self, path: &Path) -> Result<ByteSource, FdfError>;

    /// Writes `bytes` to `path`, compressed.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), FdfError>;
}

/// Maps compression tags to implementations. A missing tag means plain files.
#[derive(Clone, Default)]
pub struct CompressionRegistry {
    strategies: HashMap<String, Arc<dyn Compression>>,
}

impl CompressionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `gz`, `bz2`, `lzma`, `zst` and `mmap` with default settings.
    pub fn with_defaults() -> Self {
        Self::from_config(&FdfConfig::default())
    }

    pub fn from_config(config: &FdfConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(kernels::gzip::GzipCompression::default()));
        registry.register(Arc::new(kernels::bz2::Bzip2Compression::default()));
        registry.register(Arc::new(kernels::lzma::LzmaCompression::default()));
        registry.register(Arc::new(kernels::zstd::ZstdCompression::new(config.zstd_level)));
        registry.register(Arc::new(kernels::mmap::MmapCompression));
        registry
    }

    pub fn register(&mut self, strategy: Arc<dyn Compression>) -> Option<Arc<dyn Compression>> {
        self.strategies.insert(strategy.name().to_string(), strategy)
    }

    pub fn get(&self, tag: &str, descriptor: &str) -> Result<Arc<dyn Compression>, FdfError> {
        self.strategies
            .get(tag)
            .cloned()
            .ok_or_else(|| FdfError::UnknownCompression {
                tag: tag.to_string(),
                descriptor: descriptor.to_string(),
            })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.strategies.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Opens `path` through the strategy named by `tag`, or as a plain file.
    pub fn open(
        &self,
        tag: Option<&str>,
        path: &Path,
        descriptor: &str,
    ) -> Result<ByteSource, FdfError> {
        match tag {
            Some(tag) => self.get(tag, descriptor)?.open(path),
            None => kernels::plain::open(path),
        }
    }

    /// Writes `bytes` to `path` through the strategy named by `tag`, or as a plain file.
    pub fn write(
        &self,
        tag: Option<&str>,
        path: &Path,
        bytes: &[u8],
        descriptor: &str,
    ) -> Result<(), FdfError> {
        match tag {
            Some(tag) => self.get(tag, descriptor)?.write(path, bytes),
            None => kernels::plain::write(path, bytes),
        }
    }
}

impl fmt::Debug for CompressionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tags() {
        let registry = CompressionRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["bz2", "gz", "lzma", "mmap", "zst"]);
    }

    #[test]
    fn test_unknown_compression() {
        let registry = CompressionRegistry::new();
        let err = registry
            .open(Some("rar"), Path::new("x.txt.rar"), "x.txt.rar")
            .unwrap_err();
        assert!(matches!(err, FdfError::UnknownCompression { ref tag, .. } if tag == "rar"));
    }

    #[test]
    fn test_no_tag_reads_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let registry = CompressionRegistry::new();
        registry.write(None, &path, b"1\n2\n", "a.txt").unwrap();
        let bytes = registry.open(None, &path, "a.txt").unwrap().read_to_vec().unwrap();
        assert_eq!(bytes, b"1\n2\n");
    }
}
