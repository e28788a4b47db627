// In: src/bridge/context.rs

//! The stateful facade: one validated config plus the registries built from it.

use arrow::array::Array;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

use super::dump;
use crate::buffer_layout::BufferExtractor;
use crate::config::FdfConfig;
use crate::descriptor::{ArrayDescriptor, TreeAssembler};
use crate::error::FdfError;
use crate::kernels::with_path;
use crate::naming::{NameFilter, NameGrammar};
use crate::registry::{BackendRegistry, CompressionRegistry};
use crate::resolve::{check_syntax, Resolver};
use crate::types::FdfValue;

/// Everything needed to parse, resolve and write array files.
///
/// The grammar's compression tags are taken from the compression registry, so a
/// registered custom compression is recognized in file names automatically.
#[derive(Debug, Clone)]
pub struct FdfContext {
    config: Arc<FdfConfig>,
    filter: NameFilter,
    grammar: NameGrammar,
    backends: BackendRegistry,
    compressions: CompressionRegistry,
}

impl FdfContext {
    /// Validates `config` and registers the default backends and compressions.
    pub fn new(config: FdfConfig) -> Result<Self, FdfError> {
        config.validate()?;
        let compressions = CompressionRegistry::from_config(&config);
        Ok(Self::build(config, BackendRegistry::with_defaults(), compressions))
    }

    /// Validates `config` and uses the given registries as-is.
    pub fn with_registries(
        config: FdfConfig,
        backends: BackendRegistry,
        compressions: CompressionRegistry,
    ) -> Result<Self, FdfError> {
        config.validate()?;
        Ok(Self::build(config, backends, compressions))
    }

    fn build(
        config: FdfConfig,
        backends: BackendRegistry,
        compressions: CompressionRegistry,
    ) -> Self {
        Self {
            filter: NameFilter::from_config(&config),
            grammar: NameGrammar::new(compressions.names()),
            config: Arc::new(config),
            backends,
            compressions,
        }
    }

    pub fn config(&self) -> &FdfConfig {
        &self.config
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn compressions(&self) -> &CompressionRegistry {
        &self.compressions
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.backends, &self.compressions)
    }

    //==============================================================================
    // Parsing
    //==============================================================================

    /// Parses one file path into a flat descriptor.
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<ArrayDescriptor, FdfError> {
        let path = path.as_ref();
        let descriptor = ArrayDescriptor::from_path(path, &self.filter, &self.grammar)?;
        if self.config.strict_names {
            if let Some(raw) = descriptor.source_name() {
                return Err(FdfError::FileNameInvalid {
                    path: path.display().to_string(),
                    explanation: format!(
                        "'{}' contains characters outside [A-Za-z0-9] and {:?}",
                        raw, self.config.allowed_punctuation
                    ),
                });
            }
        }
        Ok(descriptor)
    }

    /// Parses every path and assembles the result into trees, one per column.
    pub fn parse_tree<I, P>(&self, paths: I) -> Result<Vec<ArrayDescriptor>, FdfError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut assembler = TreeAssembler::new();
        for path in paths {
            assembler.insert(self.parse_path(path)?)?;
        }
        assembler.assemble()
    }

    /// Parses every file below `dir`, recursively, in file-name order. Entries
    /// whose name starts with '.' are skipped along with everything below them.
    pub fn parse_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<ArrayDescriptor>, FdfError> {
        let dir = dir.as_ref();
        let files = collect_files(dir)?;
        log::info!("found {} array file(s) under {}", files.len(), dir.display());
        self.parse_tree(files)
    }

    //==============================================================================
    // Resolution
    //==============================================================================

    pub fn check_syntax(&self, node: &ArrayDescriptor) -> Result<(), FdfError> {
        check_syntax(node)
    }

    /// Checks and resolves one tree.
    pub fn resolve(&self, node: &ArrayDescriptor) -> Result<FdfValue, FdfError> {
        check_syntax(node)?;
        self.resolver().resolve(node)
    }

    //==============================================================================
    // Writing
    //==============================================================================

    /// Decomposes `array` into a `__buffers__` subtree below `target`, targeted at
    /// files in `dir`. Nothing is written until `dump` is called.
    pub fn extract_buffers(
        &self,
        array: &dyn Array,
        target: &ArrayDescriptor,
        dir: &Path,
    ) -> Result<ArrayDescriptor, FdfError> {
        BufferExtractor::new(&self.config).extract(array, target, dir)
    }

    /// Writes every in-memory payload of the subtree. Returns the number of files.
    pub fn dump(&self, node: &ArrayDescriptor) -> Result<usize, FdfError> {
        dump::dump_tree(node, &self.backends, &self.compressions)
    }
}

impl Default for FdfContext {
    fn default() -> Self {
        let config = FdfConfig::default();
        let compressions = CompressionRegistry::from_config(&config);
        Self::build(config, BackendRegistry::with_defaults(), compressions)
    }
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, FdfError> {
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            with_path(&path, e.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
