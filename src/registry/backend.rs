//! Backends turn a byte source into an `FdfValue` and back.

use hashbrown::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use super::ByteSource;
use crate::backends::{JsonBackend, NpyBackend, RawBufferBackend, TextBackend};
use crate::error::FdfError;
use crate::types::FdfValue;

/// A serialization format, selected by the backend tag of a file name.
///
/// `descriptor` identifies the file in error messages.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn decode(&self, source: ByteSource, descriptor: &str) -> Result<FdfValue, FdfError>;

    fn encode(
        &self,
        value: &FdfValue,
        sink: &mut dyn Write,
        descriptor: &str,
    ) -> Result<(), FdfError>;
}

/// Maps backend tags to implementations.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `txt`, `json`, `buf` and the `npy` placeholder.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextBackend));
        registry.register(Arc::new(JsonBackend));
        registry.register(Arc::new(RawBufferBackend));
        registry.register(Arc::new(NpyBackend));
        registry
    }

    /// Registers under `backend.name()`, returning any backend it replaced.
    pub fn register(&mut self, backend: Arc<dyn Backend>) -> Option<Arc<dyn Backend>> {
        self.backends.insert(backend.name().to_string(), backend)
    }

    pub fn get(&self, tag: &str, descriptor: &str) -> Result<Arc<dyn Backend>, FdfError> {
        self.backends
            .get(tag)
            .cloned()
            .ok_or_else(|| FdfError::UnknownBackend {
                tag: tag.to_string(),
                descriptor: descriptor.to_string(),
            })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.backends.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}
