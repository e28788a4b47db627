// In: src/error.rs

//! This module defines the single, unified error type for the entire fdf library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every semantic variant carries the offending file name, path or descriptor so the
//! user can correct the on-disk naming.

use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum FdfError {
    // =========================================================================
    // === Naming & Structure Errors (deterministic input errors, never retried)
    // =========================================================================
    /// The file name was rejected by the naming grammar.
    #[error("Invalid array file name '{path}':\n{explanation}")]
    FileNameInvalid { path: String, explanation: String },

    /// Two files claim the same prefix chain with a different backend or path.
    #[error("Multiple files claim array '{prefixes}': existing '{existing}', incoming '{incoming}'")]
    StructuralConflict {
        prefixes: String,
        existing: String,
        incoming: String,
    },

    /// The file names are individually valid but their combination is not.
    #[error("Invalid array file name syntax at '{descriptor}': {reason}")]
    ArrayFileNameSyntax { descriptor: String, reason: String },

    // =========================================================================
    // === Registry Errors
    // =========================================================================
    #[error("Unknown backend '{tag}' for '{descriptor}'")]
    UnknownBackend { tag: String, descriptor: String },

    #[error("Unknown compression '{tag}' for '{descriptor}'")]
    UnknownCompression { tag: String, descriptor: String },

    /// A recognized backend, compression or marker that has no implementation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    // =========================================================================
    // === Resolution Errors
    // =========================================================================
    #[error("Descriptor '{0}' has a backend but neither a path nor in-memory data")]
    DescriptorNotMaterialized(String),

    #[error("Unexpected value for '{descriptor}': expected {expected}, found {found}")]
    UnexpectedValue {
        descriptor: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while decoding records or config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl FdfError {
    /// Shorthand for the common `ArrayFileNameSyntax` construction.
    pub(crate) fn syntax(descriptor: impl ToString, reason: impl Into<String>) -> Self {
        FdfError::ArrayFileNameSyntax {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}
