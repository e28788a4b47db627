// In: src/descriptor/array_descriptor.rs

//! Defines `ArrayDescriptor`, the structured decoding of one array file name.
//!
//! A descriptor is created in one of three ways:
//! 1. parsed from a file path (a real leaf with a backend and a path),
//! 2. synthesized by the `TreeAssembler` as a virtual parent (no backend, no path),
//! 3. synthesized by the `BufferExtractor` with an in-memory payload and a target path.
//!
//! After creation a descriptor is only ever mutated by appending children.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::error::FdfError;
use crate::naming::grammar::is_ident_char;
use crate::naming::{NameFilter, NameGrammar};
use crate::types::{ArrayRole, FdfValue};

#[derive(Debug, Clone)]
pub struct ArrayDescriptor {
    prefixes: Vec<String>,
    role: ArrayRole,
    backend: Option<String>,
    compression: Option<String>,
    path: Option<PathBuf>,
    data: Option<FdfValue>,
    children: Vec<ArrayDescriptor>,
    /// The raw file name, kept only when sanitization had to change it.
    source_name: Option<String>,
}

//==================================================================================
// 1. Construction
//==================================================================================

impl ArrayDescriptor {
    /// Creates a descriptor from already-valid parts.
    pub fn new(
        prefixes: Vec<String>,
        backend: Option<String>,
        compression: Option<String>,
    ) -> Result<Self, FdfError> {
        let Some(array_name) = prefixes.last() else {
            return Err(FdfError::FileNameInvalid {
                path: String::new(),
                explanation: "a descriptor needs at least one prefix".into(),
            });
        };
        let role = ArrayRole::from_array_name(array_name);
        let joined = prefixes.join(".");
        for ident in prefixes.iter().chain(backend.iter()).chain(compression.iter()) {
            validate_ident(&joined, ident)?;
        }
        Ok(Self {
            prefixes,
            role,
            backend,
            compression,
            path: None,
            data: None,
            children: Vec::new(),
            source_name: None,
        })
    }

    /// A structural node with no backend and no backing file.
    pub fn virtual_node(prefixes: Vec<String>) -> Result<Self, FdfError> {
        Self::new(prefixes, None, None)
    }

    /// Parses the file-name component of `path`. The full path is kept.
    ///
    /// Characters outside the filter's allowed set are replaced; when that happens a
    /// warning is logged and the raw name stays available through `source_name`.
    pub fn from_path(
        path: impl AsRef<Path>,
        filter: &NameFilter,
        grammar: &NameGrammar,
    ) -> Result<Self, FdfError> {
        let path = path.as_ref();
        let raw = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .ok_or_else(|| FdfError::FileNameInvalid {
                path: path.display().to_string(),
                explanation: "the path has no file name component".into(),
            })?;

        let sanitized = filter.apply(&raw);
        let source_name = match &sanitized {
            Cow::Borrowed(_) => None,
            Cow::Owned(clean) => {
                log::warn!(
                    "file name '{}' contains disallowed characters; read as '{}'",
                    raw,
                    clean
                );
                Some(raw.to_string())
            }
        };

        let parsed = grammar
            .parse(&sanitized)
            .map_err(|e| FdfError::FileNameInvalid {
                path: path.display().to_string(),
                explanation: e.explain(),
            })?;

        let mut descriptor = Self::new(parsed.prefixes, Some(parsed.backend), parsed.compression)?;
        descriptor.path = Some(path.to_path_buf());
        descriptor.source_name = source_name;
        Ok(descriptor)
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_data(mut self, data: FdfValue) -> Self {
        self.data = Some(data);
        self
    }
}

fn validate_ident(descriptor: &str, ident: &str) -> Result<(), FdfError> {
    if ident.is_empty() || !ident.chars().all(is_ident_char) {
        return Err(FdfError::FileNameInvalid {
            path: descriptor.to_string(),
            explanation: format!("identifier '{}' must match [A-Za-z0-9_-]+", ident),
        });
    }
    Ok(())
}

//==================================================================================
// 2. Accessors
//==================================================================================

impl ArrayDescriptor {
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// The first prefix: the identity of the tree root.
    pub fn column_name(&self) -> &str {
        &self.prefixes[0]
    }

    /// The last prefix: this node's own local identifier.
    pub fn array_name(&self) -> &str {
        &self.prefixes[self.prefixes.len() - 1]
    }

    pub fn role(&self) -> &ArrayRole {
        &self.role
    }

    pub fn backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }

    pub fn compression(&self) -> Option<&str> {
        self.compression.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> Option<&FdfValue> {
        self.data.as_ref()
    }

    pub fn children(&self) -> &[ArrayDescriptor] {
        &self.children
    }

    /// The raw file name if sanitization changed it.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn was_sanitized(&self) -> bool {
        self.source_name.is_some()
    }

    /// A node that exists only to hold children: no backend, no file and no payload.
    pub fn is_virtual(&self) -> bool {
        self.backend.is_none() && self.path.is_none() && self.data.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.prefixes.len() == 1
    }

    /// The prefixes of the structural parent, or `None` for a root.
    pub fn parent_prefixes(&self) -> Option<&[String]> {
        if self.is_root() {
            None
        } else {
            Some(&self.prefixes[..self.prefixes.len() - 1])
        }
    }

    /// Prefixes joined with '.', then the backend and compression if present.
    pub fn canonical_name(&self) -> String {
        let mut name = self.prefixes.join(".");
        for tag in self.backend.iter().chain(self.compression.iter()) {
            name.push('.');
            name.push_str(tag);
        }
        name
    }

    /// The most useful identification for error messages: the path if there is one.
    pub fn label(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => self.canonical_name(),
        }
    }

    /// The direct child with the given array name.
    pub fn child(&self, array_name: &str) -> Option<&ArrayDescriptor> {
        self.children.iter().find(|c| c.array_name() == array_name)
    }

    /// Follows a chain of array names below this node.
    pub fn descendant(&self, names: &[&str]) -> Option<&ArrayDescriptor> {
        names
            .iter()
            .try_fold(self, |node, name| node.child(name))
    }

    /// Visits this node and every descendant, depth-first, parents before children.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a ArrayDescriptor)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

//==================================================================================
// 3. Mutation (children only)
//==================================================================================

impl ArrayDescriptor {
    /// Attaches `child`. Returns `Ok(false)` if an equal child is already attached.
    pub fn add_child(&mut self, child: ArrayDescriptor) -> Result<bool, FdfError> {
        if child.parent_prefixes() != Some(self.prefixes.as_slice()) {
            return Err(FdfError::StructuralConflict {
                prefixes: child.prefixes.join("."),
                existing: format!("parent '{}'", self.canonical_name()),
                incoming: format!("'{}' (not a direct child)", child.label()),
            });
        }
        if let Some(existing) = self.children.iter().find(|c| c.prefixes == child.prefixes) {
            if *existing == child {
                return Ok(false);
            }
            return Err(FdfError::StructuralConflict {
                prefixes: child.prefixes.join("."),
                existing: existing.label(),
                incoming: child.label(),
            });
        }
        self.children.push(child);
        Ok(true)
    }

    /// Detaches and returns all children.
    pub(crate) fn take_children(&mut self) -> Vec<ArrayDescriptor> {
        std::mem::take(&mut self.children)
    }

    /// Sorts children into the canonical resolution order: base providers, plain
    /// members, column transformers, array extensions, row parsers.
    pub(crate) fn sort_children(&mut self) {
        self.children.sort_by(|a, b| {
            a.role
                .canonical_cmp(&b.role)
                .then_with(|| a.array_name().cmp(b.array_name()))
        });
    }
}

//==================================================================================
// 4. Identity
//==================================================================================

/// Identity is `(prefixes, backend, path)`; compression, data and children are not
/// part of it.
impl PartialEq for ArrayDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.prefixes == other.prefixes && self.backend == other.backend && self.path == other.path
    }
}

impl Eq for ArrayDescriptor {}

impl Hash for ArrayDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefixes.hash(state);
        self.backend.hash(state);
        self.path.hash(state);
    }
}

impl fmt::Display for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

//==================================================================================
// 5. Unit Tests
//==================================================================================
